//! Streaming rewrite of the image tarball.
//!
//! The rewrite is a single forward pass: every entry except the metadata
//! entry is copied with its original header blocks and payload, in order.
//! The regenerated metadata and the template files are appended at the end.
//!
//! Entries are read raw, so GNU long-name and PAX extension headers are
//! copied verbatim instead of being re-encoded. Extension headers are held
//! back until the entry they describe is seen, so that the extensions of a
//! dropped metadata entry are dropped with it. GNU sparse entries whose map
//! spills into extension blocks are rejected, as raw reading would take
//! those blocks for the next header.

use super::metadata::METADATA_ENTRY;
use crate::error::{BuildError, ErrorExt, MetadataError, Result};
use crate::templates::TemplateRegistry;
use flate2::write::GzEncoder;
use std::fs::File;
use std::ffi::CStr;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tar::{Archive, Builder, EntryType, Header, PaxExtensions};

/// Counts reported by a rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Original entries copied unchanged
    pub copied: usize,
    /// Original metadata entries dropped
    pub replaced: usize,
    /// Entries appended (metadata plus templates)
    pub appended: usize,
}

fn is_metadata_entry(name: &str) -> bool {
    name.trim_start_matches("./") == METADATA_ENTRY
}

/// Read the payload of the metadata entry without unpacking anything else.
pub fn read_metadata<R: Read>(input: R) -> Result<Vec<u8>> {
    let mut archive = Archive::new(input);
    for entry in archive.entries()? {
        let mut entry = entry?;
        if is_metadata_entry(&entry.path()?.to_string_lossy()) {
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            return Ok(data);
        }
    }
    Err(MetadataError::MissingEntry {
        entry: METADATA_ENTRY.to_string(),
    }
    .into())
}

/// [`read_metadata`] on a tar file.
pub fn read_metadata_file(tar_path: &Path) -> Result<Vec<u8>> {
    let file = File::open(tar_path).fs_context("opening tarball", tar_path)?;
    read_metadata(BufReader::new(file))
}

/// Copy `input` to `output`, replacing the metadata entry with `metadata`
/// and appending one file per registry template under `templates/`.
///
/// Returns the writer after the end-of-archive trailer has been written.
pub fn rewrite_tar<R: Read, W: Write>(
    input: R,
    output: W,
    metadata: &[u8],
    registry: &TemplateRegistry,
) -> Result<(W, RewriteSummary)> {
    let mut summary = RewriteSummary::default();
    let mut archive = Archive::new(input);
    let mut builder = Builder::new(output);
    let mut extensions: Vec<(Header, Vec<u8>)> = Vec::new();

    for entry in archive.entries()?.raw(true) {
        let mut entry = entry?;
        let header = entry.header().clone();
        let kind = header.entry_type();

        if kind.is_gnu_longname() || kind.is_gnu_longlink() || kind.is_pax_local_extensions() {
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            extensions.push((header, data));
            continue;
        }

        let name = entry_name(&header, &extensions);
        if kind.is_gnu_sparse() && header.as_gnu().is_some_and(|gnu| gnu.is_extended()) {
            return Err(BuildError::UnsupportedEntry {
                name,
                reason: "GNU sparse file with extended sparse headers",
            });
        }
        if is_metadata_entry(&name) {
            log::debug!("Dropping original {}", name);
            extensions.clear();
            summary.replaced += 1;
            continue;
        }

        for (ext_header, data) in extensions.drain(..) {
            builder.append(&ext_header, data.as_slice())?;
        }
        log::trace!("Copying {}", name);
        builder.append(&header, &mut entry)?;
        summary.copied += 1;
    }

    // Extensions not followed by an entry are kept as they were.
    for (ext_header, data) in extensions.drain(..) {
        builder.append(&ext_header, data.as_slice())?;
    }

    let mtime = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    append_file(&mut builder, METADATA_ENTRY, metadata, mtime)?;
    summary.appended += 1;
    for template in registry.iter() {
        append_file(
            &mut builder,
            &template.archive_path(),
            template.body.as_bytes(),
            mtime,
        )?;
        summary.appended += 1;
    }

    let output = builder.into_inner()?;
    Ok((output, summary))
}

/// Rewrite the tar file at `input` into a gzip-compressed archive at
/// `output`.
///
/// The tar trailer is written before the gzip stream is finished, and the
/// gzip stream is finished before the file is flushed and synced.
pub fn write_rewritten_archive(
    input: &Path,
    output: &Path,
    metadata: &[u8],
    registry: &TemplateRegistry,
    level: flate2::Compression,
) -> Result<RewriteSummary> {
    let reader = BufReader::new(File::open(input).fs_context("opening tarball", input)?);
    let file = File::create(output).fs_context("creating output tarball", output)?;
    let encoder = GzEncoder::new(BufWriter::new(file), level);

    let (encoder, summary) = rewrite_tar(reader, encoder, metadata, registry)?;

    let writer = encoder
        .finish()
        .fs_context("finishing gzip stream", output)?;
    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .fs_context("flushing output tarball", output)?;
    file.sync_all().fs_context("syncing output tarball", output)?;

    Ok(summary)
}

fn append_file<W: Write>(
    builder: &mut Builder<W>,
    name: &str,
    content: &[u8],
    mtime: u64,
) -> io::Result<()> {
    let mut header = Header::new_ustar();
    header.set_entry_type(EntryType::Regular);
    header.set_mode(0o644);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(mtime);
    header.set_size(content.len() as u64);
    builder.append_data(&mut header, name, content)
}

/// Name of the entry described by `header`, honouring preceding GNU
/// long-name and PAX `path` extensions.
fn entry_name(header: &Header, extensions: &[(Header, Vec<u8>)]) -> String {
    let mut name = String::from_utf8_lossy(&header.path_bytes()).into_owned();
    for (ext_header, data) in extensions {
        let kind = ext_header.entry_type();
        if kind.is_gnu_longname() {
            let bytes = CStr::from_bytes_until_nul(data).map_or(data.as_slice(), CStr::to_bytes);
            name = String::from_utf8_lossy(bytes).into_owned();
        } else if kind.is_pax_local_extensions() {
            let path = PaxExtensions::new(data)
                .filter_map(std::result::Result::ok)
                .filter(|ext| ext.key_bytes() == b"path")
                .last();
            if let Some(path) = path {
                name = String::from_utf8_lossy(path.value_bytes()).into_owned();
            }
        }
    }
    name
}
