//! LXD container management.
//!
//! The build only needs a narrow set of operations from the container
//! service; they are expressed by [`ContainerManager`] so that the build
//! driver and the image rewrite can run against a fake in tests. The real
//! implementation, [`LxcCli`], shells out to the `lxc` client.
//!
//! # Module Structure
//!
//! - `availability` - `lxc` client detection
//! - `cli` - `lxc` command execution
//! - `readiness` - network readiness polling
//! - `status` - container status schema

mod availability;
mod cli;
mod readiness;
mod status;

pub use availability::check_lxc_available;
pub use cli::LxcCli;
pub use readiness::{ReadinessConfig, wait_for_network};
pub use status::{ContainerState, ContainerStatus, InterfaceAddress, NetworkInterface};

use crate::error::Result;
use std::path::Path;

/// Operations consumed from the container management service.
///
/// Every call is synchronous from the caller's point of view and any failure
/// is fatal to the build.
#[allow(async_fn_in_trait)]
pub trait ContainerManager {
    /// Launch a new container named `name` from `image`.
    async fn launch(&self, image: &str, name: &str) -> Result<()>;

    async fn stop(&self, name: &str) -> Result<()>;

    /// Publish a stopped container as an image under `alias`.
    async fn publish(&self, name: &str, alias: &str) -> Result<()>;

    async fn delete(&self, name: &str, force: bool) -> Result<()>;

    /// Run `command` through `/bin/sh -c` inside the container.
    async fn exec(&self, name: &str, command: &str) -> Result<()>;

    /// Current status of the container.
    async fn status(&self, name: &str) -> Result<ContainerStatus>;

    /// Export the image `alias` into the directory `dest`.
    async fn export_image(&self, alias: &str, dest: &Path) -> Result<()>;

    /// Import the archive at `path` as an image aliased `alias`.
    async fn import_image(&self, path: &Path, alias: &str) -> Result<()>;

    async fn delete_image(&self, fingerprint: &str) -> Result<()>;
}
