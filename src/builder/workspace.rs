//! Temporary build directory.

use crate::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build directory, removed on drop unless kept.
#[derive(Debug)]
pub enum Workspace {
    Temporary(TempDir),
    Kept(PathBuf),
}

impl Workspace {
    /// Creates a fresh directory under the system temp dir.
    pub fn create(prefix: &str, keep: bool) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .fs_context("creating build directory", std::env::temp_dir())?;

        if keep {
            let path = dir.keep();
            log::info!("Build directory: {}", path.display());
            Ok(Workspace::Kept(path))
        } else {
            Ok(Workspace::Temporary(dir))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Workspace::Temporary(dir) => dir.path(),
            Workspace::Kept(path) => path,
        }
    }
}
