//! Shared fixtures: an in-memory container manager and tarball helpers.
#![allow(dead_code)]

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use lxd_image_builder::lxd::{ContainerManager, ContainerStatus};
use lxd_image_builder::{BuildError, CliError, Result};
use std::cell::RefCell;
use std::io::Read;
use std::path::Path;

/// Container manager that records calls and serves a canned export.
pub struct FakeLxd {
    pub calls: RefCell<Vec<String>>,
    /// Files written into the export directory: (name, bytes)
    pub export_files: Vec<(String, Vec<u8>)>,
    /// Bytes of the last imported archive
    pub imported: RefCell<Option<Vec<u8>>>,
    pub network_ready: bool,
    /// Operation name that fails, e.g. "exec"
    pub fail_on: Option<&'static str>,
}

impl FakeLxd {
    pub fn with_export(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            export_files: vec![(name.to_string(), bytes)],
            imported: RefCell::new(None),
            network_ready: true,
            fail_on: None,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, op: &'static str, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call.clone());
        if self.fail_on == Some(op) {
            return Err(BuildError::Cli(CliError::ExecutionFailed {
                command: call,
                reason: "exit status 1".to_string(),
            }));
        }
        Ok(())
    }
}

impl ContainerManager for FakeLxd {
    async fn launch(&self, image: &str, name: &str) -> Result<()> {
        self.record("launch", format!("launch {image} {name}"))
    }

    async fn stop(&self, _name: &str) -> Result<()> {
        self.record("stop", "stop".to_string())
    }

    async fn publish(&self, _name: &str, alias: &str) -> Result<()> {
        self.record("publish", format!("publish {alias}"))
    }

    async fn delete(&self, _name: &str, force: bool) -> Result<()> {
        self.record("delete", format!("delete force={force}"))
    }

    async fn exec(&self, _name: &str, command: &str) -> Result<()> {
        let program = command.split_whitespace().next().unwrap_or_default();
        self.record("exec", format!("exec {program}"))
    }

    async fn status(&self, _name: &str) -> Result<ContainerStatus> {
        self.record("status", "status".to_string())?;
        let json = if self.network_ready {
            r#"{"state": {"status": "Running", "network": {
                "eth0": {"state": "up", "addresses": [{"family": "inet", "address": "10.1.1.5", "scope": "global"}]}
            }}}"#
        } else {
            r#"{"state": {"status": "Running", "network": {
                "eth0": {"state": "up", "addresses": [{"family": "inet6", "address": "fe80::5", "scope": "link"}]}
            }}}"#
        };
        Ok(serde_json::from_str(json).unwrap())
    }

    async fn export_image(&self, alias: &str, dest: &Path) -> Result<()> {
        self.record("export", format!("export {alias}"))?;
        for (name, bytes) in &self.export_files {
            std::fs::write(dest.join(name), bytes)?;
        }
        Ok(())
    }

    async fn import_image(&self, path: &Path, alias: &str) -> Result<()> {
        self.record("import", format!("import {alias}"))?;
        *self.imported.borrow_mut() = Some(std::fs::read(path)?);
        Ok(())
    }

    async fn delete_image(&self, fingerprint: &str) -> Result<()> {
        self.record("delete_image", format!("delete_image {fingerprint}"))
    }
}

/// Gzip-compressed tarball with the given regular files, in order.
pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::fast()));
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_mode(0o644);
        header.set_size(data.len() as u64);
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Entries of a gzip-compressed tarball as (name, payload), in order.
pub fn entries(tar_gz: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = tar::Archive::new(GzDecoder::new(tar_gz));
    archive
        .entries()
        .unwrap()
        .map(|e| {
            let mut e = e.unwrap();
            let name = e.path().unwrap().to_string_lossy().into_owned();
            let mut data = Vec::new();
            e.read_to_end(&mut data).unwrap();
            (name, data)
        })
        .collect()
}
