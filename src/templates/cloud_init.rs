//! cloud-init NoCloud seed templates.
//!
//! The bodies are LXD template source; they are evaluated by LXD when a
//! container is created or copied from the image, never by this crate.

use super::SeedTemplate;
use crate::image::TemplateTrigger;

/// Seed directory read by cloud-init's NoCloud datasource.
pub const SEED_DIR: &str = "/var/lib/cloud/seed/nocloud-net";

/// Fallback for user-data and vendor-data when no config key is set.
pub const EMPTY_CLOUD_CONFIG: &str = "#cloud-config\n{}";

const ON_CREATE_OR_COPY: &[TemplateTrigger] = &[TemplateTrigger::Create, TemplateTrigger::Copy];

const META_DATA: &str = r#"#cloud-config
instance-id: {{ container.name }}
local-hostname: {{ container.name }}
{{ config_get("user.meta-data", "") }}"#;

const NETWORK_CONFIG: &str = r#"{% if config_get("user.network-config", "") == "" %}version: 1
config:
    - type: physical
      name: eth0
      subnets:
          - type: {% if config_get("user.network_mode", "") == "link-local" %}manual{% else %}dhcp{% endif %}
            control: auto{% else %}{{ config_get("user.network-config", "") }}{% endif %}"#;

const USER_DATA: &str = r#"{{ config_get("user.user-data", properties.default) }}"#;

const VENDOR_DATA: &str = r#"{{ config_get("user.vendor-data", properties.default) }}"#;

/// The four seed files injected into every built image.
pub fn seed_templates() -> Vec<SeedTemplate> {
    vec![
        SeedTemplate {
            destination: "/var/lib/cloud/seed/nocloud-net/meta-data",
            file_name: "cloud-init-meta.tpl",
            body: META_DATA,
            when: ON_CREATE_OR_COPY,
            properties: &[],
        },
        SeedTemplate {
            destination: "/var/lib/cloud/seed/nocloud-net/network-config",
            file_name: "cloud-init-network.tpl",
            body: NETWORK_CONFIG,
            when: ON_CREATE_OR_COPY,
            properties: &[],
        },
        SeedTemplate {
            destination: "/var/lib/cloud/seed/nocloud-net/user-data",
            file_name: "cloud-init-user.tpl",
            body: USER_DATA,
            when: ON_CREATE_OR_COPY,
            properties: &[("default", EMPTY_CLOUD_CONFIG)],
        },
        SeedTemplate {
            destination: "/var/lib/cloud/seed/nocloud-net/vendor-data",
            file_name: "cloud-init-vendor.tpl",
            body: VENDOR_DATA,
            when: ON_CREATE_OR_COPY,
            properties: &[("default", EMPTY_CLOUD_CONFIG)],
        },
    ]
}
