//! Image build orchestration.
//!
//! This module provides the [`ImageBuilder`] that takes a stock container
//! image to a cloud-init enabled one:
//!
//! 1. Launches a build container and waits for its network
//! 2. Installs cloud-init and the guest tooling inside it
//! 3. Publishes the container as an image
//! 4. Injects the cloud-init seed templates into the published image
//!
//! # Example
//!
//! ```no_run
//! use lxd_image_builder::builder::{BuildConfig, ImageBuilder};
//! use lxd_image_builder::lxd::LxcCli;
//!
//! # async fn example() -> lxd_image_builder::Result<()> {
//! let lxc = LxcCli::new();
//! let config = BuildConfig::new("images:centos/7", "centos7/cloud-init", false);
//! ImageBuilder::new(&lxc, config).build().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod customize;
mod orchestrator;
mod workspace;

pub use config::{
    BuildConfig, CONTAINER_PREFIX, DEFAULT_ALIAS, DEFAULT_BASE_IMAGE, WORKSPACE_PREFIX,
};
pub use customize::{DEFAULT_CUSTOMIZATION, customize_container};
pub use orchestrator::ImageBuilder;
pub use workspace::Workspace;
