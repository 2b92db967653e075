//! Cloud-init enabled LXD image builder
//!
//! This library builds an LXD image that provisions itself with cloud-init:
//! - Launches and customizes a build container
//! - Publishes it as an image
//! - Rewrites the exported image tarball to add cloud-init seed templates
//! - Re-imports the result under the target alias
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod builder;
pub mod cli;
pub mod error;
pub mod image;
pub mod lxd;
pub mod templates;

// Re-export commonly used types
pub use error::{BuildError, CliError, MetadataError, Result};
