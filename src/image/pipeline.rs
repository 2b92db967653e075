//! Export, rewrite and re-import of a published image.

use super::archive::{RewriteSummary, read_metadata_file, write_rewritten_archive};
use super::checksum::calculate_sha256;
use super::export::{decompress, locate_export};
use super::import::import_and_cleanup;
use super::metadata::ImageMetadata;
use crate::error::{BuildError, ErrorExt, Result};
use crate::lxd::ContainerManager;
use crate::templates::TemplateRegistry;
use std::path::{Path, PathBuf};

/// Subdirectory of the work directory the image is exported into.
pub const EXPORT_DIR: &str = "export";

/// File name of the rewritten archive in the work directory.
pub const OUTPUT_ARCHIVE: &str = "output.tar.gz";

/// What to inject and how to compress the result.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    pub registry: TemplateRegistry,
    pub compression: flate2::Compression,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            registry: TemplateRegistry::cloud_init(),
            compression: flate2::Compression::default(),
        }
    }
}

/// Result of [`prepare_archive`].
#[derive(Debug, Clone)]
pub struct PreparedArchive {
    /// Rewritten, compressed archive
    pub archive: PathBuf,
    /// Fingerprint of the exported (intermediate) image
    pub fingerprint: String,
    /// SHA-256 of the rewritten archive
    pub sha256: String,
    pub summary: RewriteSummary,
}

/// Rewrites the image `alias` with the registry templates and re-imports it
/// under the same alias.
///
/// # Process
///
/// 1. Exports the image into `<work_dir>/export`
/// 2. Rewrites the exported tarball (see [`prepare_archive`])
/// 3. Imports the result under `alias`
/// 4. Deletes the intermediate image by its fingerprint
pub async fn rewrite_image<M: ContainerManager>(
    manager: &M,
    alias: &str,
    work_dir: &Path,
    options: &RewriteOptions,
) -> Result<()> {
    let export_dir = work_dir.join(EXPORT_DIR);
    tokio::fs::create_dir_all(&export_dir)
        .await
        .fs_context("creating export directory", &export_dir)?;
    manager.export_image(alias, &export_dir).await?;

    let output = work_dir.join(OUTPUT_ARCHIVE);
    let options = options.clone();
    let prepared = tokio::task::spawn_blocking(move || {
        prepare_archive(&export_dir, &output, &options.registry, options.compression)
    })
    .await
    .map_err(|e| BuildError::Task(format!("archive rewrite task failed: {}", e)))??;

    log::info!(
        "Rewrote image archive: {} entries copied, {} replaced, {} added (sha256 {})",
        prepared.summary.copied,
        prepared.summary.replaced,
        prepared.summary.appended,
        prepared.sha256
    );

    import_and_cleanup(manager, &prepared.archive, alias, &prepared.fingerprint).await
}

/// Turns the export in `export_dir` into the rewritten archive at `output`.
///
/// The metadata is parsed and updated before `output` is created, so a
/// malformed document leaves no output behind.
pub fn prepare_archive(
    export_dir: &Path,
    output: &Path,
    registry: &TemplateRegistry,
    compression: flate2::Compression,
) -> Result<PreparedArchive> {
    let exported = locate_export(export_dir)?;
    log::debug!(
        "Exported image {} at {}",
        exported.fingerprint,
        exported.path.display()
    );
    let tar_path = decompress(&exported)?;

    let mut metadata = ImageMetadata::from_yaml(&read_metadata_file(&tar_path)?)?;
    metadata.apply_templates(registry);
    let metadata = metadata.to_yaml()?;

    log::info!("Updating metadata/templates in tarball");
    let summary = write_rewritten_archive(&tar_path, output, &metadata, registry, compression)?;
    let sha256 = calculate_sha256(output)?;

    Ok(PreparedArchive {
        archive: output.to_path_buf(),
        fingerprint: exported.fingerprint,
        sha256,
        summary,
    })
}
