//! Command line argument parsing and validation.

use crate::builder::{BuildConfig, DEFAULT_ALIAS, DEFAULT_BASE_IMAGE};
use clap::Parser;

/// Builds a cloud-init enabled LXD image
#[derive(Parser, Debug)]
#[command(
    name = "lxd_image_builder",
    version,
    about = "Builds a cloud-init enabled LXD image",
    long_about = "Launches a container from the base image, installs cloud-init in it, publishes it
as an image and injects cloud-init NoCloud seed templates into the image metadata.

Usage:
  lxd_image_builder
  lxd_image_builder --image images:centos/7 --alias juju/centos7/amd64
  lxd_image_builder --keep

Exit code 0 = the image is available under the alias."
)]
pub struct Args {
    /// Base image to launch the build container from
    #[arg(long, value_name = "IMAGE", default_value = DEFAULT_BASE_IMAGE, env = "LXD_IMAGE_BUILDER_IMAGE")]
    pub image: String,

    /// Alias for the new image
    #[arg(long, value_name = "ALIAS", default_value = DEFAULT_ALIAS, env = "LXD_IMAGE_BUILDER_ALIAS")]
    pub alias: String,

    /// Keep the build directory and build container
    #[arg(long)]
    pub keep: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.image.trim().is_empty() {
            return Err("Image cannot be empty".to_string());
        }
        if self.alias.trim().is_empty() {
            return Err("Alias cannot be empty".to_string());
        }
        Ok(())
    }
}

impl From<&Args> for BuildConfig {
    fn from(args: &Args) -> Self {
        BuildConfig::new(&args.image, &args.alias, args.keep)
    }
}
