//! `lxc` client command execution.

use super::ContainerManager;
use super::status::{ContainerStatus, parse_status_list};
use crate::error::{BuildError, CliError, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// [`ContainerManager`] backed by the `lxc` command line client.
///
/// Commands inherit stdout and stderr so their progress is visible to the
/// operator. No timeout is applied to individual commands.
#[derive(Debug, Clone)]
pub struct LxcCli {
    program: String,
}

impl LxcCli {
    pub fn new() -> Self {
        Self::with_program("lxc")
    }

    /// Use a different client binary (e.g. `lxc` from a snap path).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }

    /// Run the client to completion, failing on non-zero exit.
    async fn run(&self, args: &[&str]) -> Result<()> {
        let command = self.command_line(args);
        log::info!("Running command: {}", command);

        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                BuildError::Cli(CliError::ExecutionFailed {
                    command: command.clone(),
                    reason: e.to_string(),
                })
            })?;

        if !status.success() {
            return Err(BuildError::Cli(CliError::ExecutionFailed {
                command,
                reason: format!("exit status {}", status),
            }));
        }
        Ok(())
    }

    /// Run the client and capture stdout; stderr stays attached.
    async fn output(&self, args: &[&str]) -> Result<Vec<u8>> {
        let command = self.command_line(args);
        log::debug!("Running command: {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| {
                BuildError::Cli(CliError::ExecutionFailed {
                    command: command.clone(),
                    reason: e.to_string(),
                })
            })?;

        if !output.status.success() {
            return Err(BuildError::Cli(CliError::ExecutionFailed {
                command,
                reason: format!("exit status {}", output.status),
            }));
        }
        Ok(output.stdout)
    }
}

impl Default for LxcCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerManager for LxcCli {
    async fn launch(&self, image: &str, name: &str) -> Result<()> {
        self.run(&["launch", image, name]).await
    }

    async fn stop(&self, name: &str) -> Result<()> {
        self.run(&["stop", name]).await
    }

    async fn publish(&self, name: &str, alias: &str) -> Result<()> {
        let alias_arg = format!("--alias={}", alias);
        self.run(&["publish", &alias_arg, name]).await
    }

    async fn delete(&self, name: &str, force: bool) -> Result<()> {
        if force {
            self.run(&["delete", "--force", name]).await
        } else {
            self.run(&["delete", name]).await
        }
    }

    async fn exec(&self, name: &str, command: &str) -> Result<()> {
        self.run(&["exec", name, "--", "/bin/sh", "-c", command]).await
    }

    async fn status(&self, name: &str) -> Result<ContainerStatus> {
        let stdout = self.output(&["list", "--format=json", name]).await?;
        parse_status_list(&stdout)?
            .into_iter()
            .next()
            .ok_or_else(|| BuildError::ContainerNotFound {
                container: name.to_string(),
            })
    }

    async fn export_image(&self, alias: &str, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        self.run(&["image", "export", alias, &dest]).await
    }

    async fn import_image(&self, path: &Path, alias: &str) -> Result<()> {
        let alias_arg = format!("--alias={}", alias);
        let path = path.to_string_lossy();
        self.run(&["image", "import", &alias_arg, &path]).await
    }

    async fn delete_image(&self, fingerprint: &str) -> Result<()> {
        self.run(&["image", "delete", fingerprint]).await
    }
}
