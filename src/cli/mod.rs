//! Command line interface.

mod args;

pub use args::Args;

use crate::builder::{BuildConfig, ImageBuilder};
use crate::error::{CliError, Result};
use crate::lxd::{LxcCli, check_lxc_available};

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    check_lxc_available()?;

    let config = BuildConfig::from(&args);
    let lxc = LxcCli::new();
    ImageBuilder::new(&lxc, config).build().await
}
