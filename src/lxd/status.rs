//! Container status as reported by `lxc list --format=json`.

use serde::Deserialize;
use std::collections::HashMap;

/// Loopback interface name, never considered for readiness.
pub const LOOPBACK_INTERFACE: &str = "lo";

/// One record of the status query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerStatus {
    /// Runtime state; absent for containers that are not running
    #[serde(default)]
    pub state: Option<ContainerState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerState {
    /// "Running", "Stopped", ...
    #[serde(default)]
    pub status: String,

    #[serde(default, rename = "network")]
    pub networks: Option<HashMap<String, NetworkInterface>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkInterface {
    /// "up" or "down"
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub addresses: Vec<InterfaceAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceAddress {
    /// "inet" or "inet6"
    #[serde(default)]
    pub family: String,

    #[serde(default)]
    pub address: String,

    /// "global", "link", "local"
    #[serde(default)]
    pub scope: String,
}

impl InterfaceAddress {
    fn is_global_ipv4(&self) -> bool {
        self.family == "inet" && self.scope == "global"
    }
}

impl ContainerStatus {
    pub fn is_running(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.status.eq_ignore_ascii_case("running"))
    }

    /// First global IPv4 address on an up, non-loopback interface, if the
    /// container is running.
    pub fn global_ipv4(&self) -> Option<(&str, &InterfaceAddress)> {
        if !self.is_running() {
            return None;
        }
        let networks = self.state.as_ref()?.networks.as_ref()?;
        networks
            .iter()
            .filter(|(name, iface)| name.as_str() != LOOPBACK_INTERFACE && iface.state == "up")
            .find_map(|(name, iface)| {
                iface
                    .addresses
                    .iter()
                    .find(|a| a.is_global_ipv4())
                    .map(|a| (name.as_str(), a))
            })
    }
}

/// Parse the JSON array returned by the status query.
pub fn parse_status_list(json: &[u8]) -> serde_json::Result<Vec<ContainerStatus>> {
    serde_json::from_slice(json)
}
