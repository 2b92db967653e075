//! Typed `metadata.yaml` schema.
//!
//! Only the `templates` mapping is interpreted. Every other top-level key
//! (architecture, creation date, properties, ...) is carried through
//! unchanged.

use crate::error::MetadataError;
use crate::templates::TemplateRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved archive entry holding the image metadata.
pub const METADATA_ENTRY: &str = "metadata.yaml";

/// Lifecycle events a template is rendered on.
///
/// Trigger names this crate does not know are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateTrigger {
    Create,
    Copy,
    Start,
    Rename,
    #[serde(untagged)]
    Other(String),
}

/// One entry of the `templates` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// File name under `templates/` in the archive
    pub template: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub when: Vec<TemplateTrigger>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub create_only: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,

    /// Remaining descriptor keys (`uid`, `gid`, `mode`, ...)
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// Parsed image metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Guest path -> template descriptor
    pub templates: BTreeMap<String, TemplateDescriptor>,

    /// Remaining top-level keys, in document order
    #[serde(flatten)]
    pub other: serde_yaml::Mapping,
}

impl ImageMetadata {
    /// Parse a metadata document.
    ///
    /// Fails if `templates` is absent or is not a mapping of descriptors.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self, MetadataError> {
        serde_yaml::from_slice(bytes).map_err(MetadataError::Schema)
    }

    pub fn to_yaml(&self) -> Result<Vec<u8>, MetadataError> {
        serde_yaml::to_string(self)
            .map(String::into_bytes)
            .map_err(MetadataError::Serialize)
    }

    /// Record every registry template, replacing any descriptor already
    /// present at the same destination path.
    pub fn apply_templates(&mut self, registry: &TemplateRegistry) {
        for template in registry.iter() {
            if let Some(previous) = self
                .templates
                .insert(template.destination.to_string(), template.descriptor())
            {
                log::debug!(
                    "Replacing template for {} (was {})",
                    template.destination,
                    previous.template
                );
            }
        }
    }
}
