//! Image import and intermediate image cleanup.

use crate::error::Result;
use crate::lxd::ContainerManager;
use std::path::Path;

/// Imports `archive` under `alias`, then deletes the intermediate image
/// identified by `fingerprint`.
///
/// The import moves `alias` onto the new image; what happens to an existing
/// image with the same alias is up to the image service.
pub async fn import_and_cleanup<M: ContainerManager>(
    manager: &M,
    archive: &Path,
    alias: &str,
    fingerprint: &str,
) -> Result<()> {
    log::info!("Importing {} as {}", archive.display(), alias);
    manager.import_image(archive, alias).await?;

    log::info!("Deleting intermediate image {}", fingerprint);
    manager.delete_image(fingerprint).await
}
