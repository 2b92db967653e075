//! Build container lifecycle.

use super::config::{BuildConfig, WORKSPACE_PREFIX};
use super::customize::customize_container;
use super::workspace::Workspace;
use crate::error::Result;
use crate::image::rewrite_image;
use crate::lxd::{ContainerManager, wait_for_network};
use std::path::Path;
use uuid::Uuid;

/// Build container, tracked so cleanup knows whether it still exists.
#[derive(Debug)]
struct BuildContainer {
    name: String,
    deleted: bool,
}

/// Builds the cloud-init enabled image.
///
/// Drives one build from launch to import. Every step is fatal on error;
/// cleanup of the container and build directory runs on every exit path
/// unless the configuration asks to keep them.
#[derive(Debug)]
pub struct ImageBuilder<'a, M> {
    manager: &'a M,
    config: BuildConfig,
}

impl<'a, M: ContainerManager> ImageBuilder<'a, M> {
    pub fn new(manager: &'a M, config: BuildConfig) -> Self {
        Self { manager, config }
    }

    /// Runs the build.
    ///
    /// # Process
    ///
    /// 1. Creates the build directory
    /// 2. Launches the build container from the base image
    /// 3. Waits for network connectivity
    /// 4. Runs the customization commands
    /// 5. Stops and publishes the container under the alias
    /// 6. Deletes the container
    /// 7. Rewrites the published image with the seed templates
    pub async fn build(&self) -> Result<()> {
        let workspace = Workspace::create(WORKSPACE_PREFIX, self.config.keep)?;

        let name = format!("{}-{}", self.config.container_prefix, Uuid::new_v4().simple());
        self.manager.launch(&self.config.base_image, &name).await?;
        if self.config.keep {
            log::info!("Build container: {}", name);
        }
        let mut container = BuildContainer {
            name,
            deleted: false,
        };

        let result = self.run(&mut container, workspace.path()).await;

        if !self.config.keep && !container.deleted {
            if let Err(e) = self.manager.delete(&container.name, true).await {
                log::warn!("Deleting build container {}: {}", container.name, e);
            }
        }
        result
    }

    async fn run(&self, container: &mut BuildContainer, work_dir: &Path) -> Result<()> {
        wait_for_network(self.manager, &container.name, &self.config.readiness).await?;
        customize_container(self.manager, &container.name, &self.config.customization).await?;

        self.manager.stop(&container.name).await?;
        self.manager
            .publish(&container.name, &self.config.alias)
            .await?;
        self.manager.delete(&container.name, false).await?;
        container.deleted = true;

        rewrite_image(self.manager, &self.config.alias, work_dir, &self.config.rewrite).await
    }
}
