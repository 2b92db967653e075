//! `lxc` client availability checking.

use crate::error::{BuildError, CliError, Result};

/// Checks that the `lxc` client can be found in `PATH`.
///
/// # Returns
///
/// * `Ok(())` - The client is installed
/// * `Err` - The client is missing
pub fn check_lxc_available() -> Result<()> {
    match which::which("lxc") {
        Ok(path) => {
            log::debug!("Found lxc at: {}", path.display());
            Ok(())
        }
        Err(e) => Err(BuildError::Cli(CliError::ExecutionFailed {
            command: "lxc".to_string(),
            reason: format!(
                "lxc command not found: {}\n\
                 \n\
                 The LXD client does not appear to be installed.\n\
                 Install LXD (e.g. `snap install lxd`) and run `lxd init`.",
                e
            ),
        })),
    }
}
