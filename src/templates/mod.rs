//! Static registry of template files injected into the image.
//!
//! Each entry maps a destination path inside the guest to a template file
//! stored under `templates/` in the image archive, together with the
//! descriptor written into `metadata.yaml`. Destination paths and file names
//! are a compatibility surface with guests: changing them breaks images
//! already relying on them.

mod cloud_init;

pub use cloud_init::{EMPTY_CLOUD_CONFIG, SEED_DIR};

use crate::image::{TemplateDescriptor, TemplateTrigger};

/// Archive directory holding template files.
pub const TEMPLATES_DIR: &str = "templates";

/// One injected template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTemplate {
    /// Path of the rendered file inside the guest
    pub destination: &'static str,
    /// File name under `templates/`
    pub file_name: &'static str,
    /// Template source, stored verbatim
    pub body: &'static str,
    /// Lifecycle events the template is rendered on
    pub when: &'static [TemplateTrigger],
    /// Default properties available to the template
    pub properties: &'static [(&'static str, &'static str)],
}

impl SeedTemplate {
    /// Descriptor recorded under `templates` in the image metadata.
    pub fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            template: self.file_name.to_string(),
            when: self.when.to_vec(),
            create_only: false,
            properties: self
                .properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            extra: serde_yaml::Mapping::new(),
        }
    }

    /// Archive entry name of the template file.
    pub fn archive_path(&self) -> String {
        format!("{}/{}", TEMPLATES_DIR, self.file_name)
    }
}

/// Read-only set of templates to inject.
///
/// Consumers must not depend on iteration order: every destination path is
/// independent of the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRegistry {
    templates: Vec<SeedTemplate>,
}

impl TemplateRegistry {
    /// Registry over an explicit template list.
    pub fn new(templates: Vec<SeedTemplate>) -> Self {
        Self { templates }
    }

    /// The cloud-init NoCloud seed templates.
    pub fn cloud_init() -> Self {
        Self::new(cloud_init::seed_templates())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeedTemplate> {
        self.templates.iter()
    }

    pub fn get(&self, destination: &str) -> Option<&SeedTemplate> {
        self.templates.iter().find(|t| t.destination == destination)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.templates.len()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::cloud_init()
    }
}
