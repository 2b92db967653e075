//! Exported image discovery and decompression.

use crate::error::{BuildError, ErrorExt, Result};
use flate2::read::MultiGzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Compression schemes the exported tarball may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
}

impl Compression {
    /// Detect the compression from the file's final extension.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        match Path::new(file_name).extension().and_then(|e| e.to_str()) {
            Some("gz") => Ok(Compression::Gzip),
            _ => Err(BuildError::UnsupportedCompression {
                file: file_name.to_string(),
            }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Compression::Gzip => "gz",
        }
    }
}

/// The single combined tarball produced by an image export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub path: PathBuf,
    /// Fingerprint of the published image, taken from the file name
    pub fingerprint: String,
}

/// Image fingerprint: the file name up to its first `.`.
pub fn fingerprint_from_file_name(file_name: &str) -> Result<String> {
    match file_name.split('.').next() {
        Some(fingerprint) if !fingerprint.is_empty() => Ok(fingerprint.to_string()),
        _ => Err(BuildError::InvalidExportName {
            file: file_name.to_string(),
        }),
    }
}

/// Find the exported tarball in `dir`.
///
/// Only the combined format is supported: a split export (separate rootfs
/// and metadata files) or an empty directory is rejected.
pub fn locate_export(dir: &Path) -> Result<ExportedImage> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).fs_context("reading export directory", dir)? {
        let entry = entry.fs_context("reading export directory entry", dir)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    if names.len() != 1 {
        return Err(BuildError::ExportShape {
            count: names.len(),
            names,
        });
    }

    let file_name = names.remove(0);
    let fingerprint = fingerprint_from_file_name(&file_name)?;
    Ok(ExportedImage {
        path: dir.join(file_name),
        fingerprint,
    })
}

/// Decompress the exported tarball next to itself, removing the compressed
/// file afterwards.
///
/// Returns the path of the plain tar archive.
pub fn decompress(image: &ExportedImage) -> Result<PathBuf> {
    let file_name = image
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let compression = Compression::from_file_name(&file_name)?;
    let tar_path = image.path.with_extension("");

    match compression {
        Compression::Gzip => {
            let input = File::open(&image.path).fs_context("opening exported tarball", &image.path)?;
            let mut decoder = MultiGzDecoder::new(BufReader::new(input));

            let output = File::create(&tar_path).fs_context("creating tarball", &tar_path)?;
            let mut writer = BufWriter::new(output);
            io::copy(&mut decoder, &mut writer).fs_context("decompressing tarball", &image.path)?;
            writer.flush().fs_context("writing tarball", &tar_path)?;
        }
    }

    fs::remove_file(&image.path).fs_context("removing compressed tarball", &image.path)?;
    log::debug!(
        "Decompressed {} ({}) to {}",
        image.path.display(),
        compression.extension(),
        tar_path.display()
    );
    Ok(tar_path)
}
