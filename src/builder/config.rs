//! Build configuration and defaults.

use super::customize::DEFAULT_CUSTOMIZATION;
use crate::image::RewriteOptions;
use crate::lxd::ReadinessConfig;

/// Base image the build container is launched from
pub const DEFAULT_BASE_IMAGE: &str = "images:centos/7";

/// Alias the finished image is imported under
pub const DEFAULT_ALIAS: &str = "juju/centos7/amd64";

/// Prefix of build container names
pub const CONTAINER_PREFIX: &str = "lxd-image-build";

/// Prefix of the temporary build directory
pub const WORKSPACE_PREFIX: &str = "lxd-image-build";

/// Everything a build needs, fixed before the build starts.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Image the build container is launched from
    pub base_image: String,
    /// Alias of the resulting image
    pub alias: String,
    /// Keep the build directory and container for debugging
    pub keep: bool,
    pub container_prefix: String,
    /// Shell commands run inside the container before publishing
    pub customization: Vec<String>,
    pub readiness: ReadinessConfig,
    pub rewrite: RewriteOptions,
}

impl BuildConfig {
    pub fn new(base_image: impl Into<String>, alias: impl Into<String>, keep: bool) -> Self {
        Self {
            base_image: base_image.into(),
            alias: alias.into(),
            keep,
            container_prefix: CONTAINER_PREFIX.to_string(),
            customization: DEFAULT_CUSTOMIZATION.iter().map(|c| c.to_string()).collect(),
            readiness: ReadinessConfig::default(),
            rewrite: RewriteOptions::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_IMAGE, DEFAULT_ALIAS, false)
    }
}
