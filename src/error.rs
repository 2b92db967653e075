//! Error types for image build operations.
//!
//! Every failure is fatal: errors propagate to `main`, which logs them and
//! exits non-zero.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for image build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for all image build operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// CLI argument and external command errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO errors with the file they concern
    #[error("{context} ({}): {source}", .path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON errors from the container status query
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image metadata errors
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// The export did not produce a single combined tarball
    #[error("expected a single tarball, found {count} ({names:?})")]
    ExportShape {
        /// Number of files found
        count: usize,
        /// Names of the files found
        names: Vec<String>,
    },

    /// The exported tarball uses a compression we cannot decompress
    #[error("Unhandled compression type in tarball: {file}")]
    UnsupportedCompression {
        /// Exported file name
        file: String,
    },

    /// The exported file name carries no fingerprint
    #[error("cannot derive image fingerprint from file name: {file}")]
    InvalidExportName {
        /// Exported file name
        file: String,
    },

    /// The tarball holds an entry the streaming rewrite cannot copy
    #[error("cannot copy tarball entry {name}: {reason}")]
    UnsupportedEntry {
        /// Entry name
        name: String,
        /// What is unsupported
        reason: &'static str,
    },

    /// The status query returned no record for the container
    #[error("container not found: {container}")]
    ContainerNotFound {
        /// Container name
        container: String,
    },

    /// The container never reported a global IPv4 address
    #[error("timed out waiting for network connectivity of {container} after {}s", .waited.as_secs())]
    NetworkTimeout {
        /// Container name
        container: String,
        /// Time spent polling
        waited: Duration,
    },

    /// Blocking worker failure
    #[error("background task failed: {0}")]
    Task(String),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Errors reading or writing the image metadata document.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The archive has no metadata entry
    #[error("archive has no {entry} entry")]
    MissingEntry {
        /// Reserved entry name
        entry: String,
    },

    /// The document does not match the metadata schema
    #[error("invalid image metadata: {0}")]
    Schema(#[source] serde_yaml::Error),

    /// The document could not be serialized
    #[error("cannot serialize image metadata: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

impl BuildError {
    /// Whether this is the network readiness timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, BuildError::NetworkTimeout { .. })
    }
}

/// Attach file context to I/O results.
pub trait ErrorExt<T> {
    /// Wrap an I/O error with the action and path it concerns.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::io::Result<T> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| BuildError::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}
