//! Image archive rewrite.
//!
//! A published image is exported as a single gzip-compressed tarball holding
//! `metadata.yaml` and the root filesystem. This module decompresses it,
//! adds the registry templates to the metadata, streams the entries into a
//! new compressed tarball with the template files appended, and imports the
//! result over the original alias.
//!
//! # Module Organization
//!
//! - [`archive`] - Single-pass tar rewrite
//! - `checksum` - SHA-256 of the rewritten archive
//! - [`export`] - Export discovery, fingerprint and decompression
//! - `import` - Import and intermediate image cleanup
//! - [`metadata`] - Typed `metadata.yaml` schema
//! - `pipeline` - The full export/rewrite/import sequence

pub mod archive;
mod checksum;
pub mod export;
mod import;
pub mod metadata;
mod pipeline;

pub use archive::{RewriteSummary, read_metadata, rewrite_tar, write_rewritten_archive};
pub use checksum::calculate_sha256;
pub use export::{Compression, ExportedImage, decompress, fingerprint_from_file_name, locate_export};
pub use import::import_and_cleanup;
pub use metadata::{ImageMetadata, METADATA_ENTRY, TemplateDescriptor, TemplateTrigger};
pub use pipeline::{
    EXPORT_DIR, OUTPUT_ARCHIVE, PreparedArchive, RewriteOptions, prepare_archive, rewrite_image,
};
