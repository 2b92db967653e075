//! Network readiness polling.

use super::ContainerManager;
use crate::error::{BuildError, Result};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Interval between status queries (1 second)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Time allowed for the container to obtain an address (1 minute)
pub const DEFAULT_NETWORK_DEADLINE: Duration = Duration::from_secs(60);

/// Polling parameters for [`wait_for_network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessConfig {
    pub interval: Duration,
    pub deadline: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            deadline: DEFAULT_NETWORK_DEADLINE,
        }
    }
}

/// Waits until the container is running with a global IPv4 address on a
/// non-loopback interface that is up.
///
/// The deadline is fixed when polling starts. A failing status query aborts
/// immediately; it is not retried.
///
/// # Returns
///
/// * `Ok(())` - The container has network connectivity
/// * `Err(BuildError::NetworkTimeout)` - The deadline passed first
/// * `Err` - The status query failed
pub async fn wait_for_network<M: ContainerManager>(
    manager: &M,
    container: &str,
    config: &ReadinessConfig,
) -> Result<()> {
    log::info!("Waiting for network connectivity");

    let start = Instant::now();
    let deadline = start + config.deadline;
    loop {
        let status = manager.status(container).await?;
        if let Some((iface, addr)) = status.global_ipv4() {
            log::info!(
                "Container {} has address {} on {}",
                container,
                addr.address,
                iface
            );
            return Ok(());
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        log::trace!("No global IPv4 address on {} yet", container);
        sleep(config.interval.min(deadline - now)).await;
    }

    Err(BuildError::NetworkTimeout {
        container: container.to_string(),
        waited: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::lxd::status::ContainerStatus;
    use std::cell::Cell;
    use std::path::Path;

    /// Status source that becomes ready after `ready_after` queries.
    struct StatusSource {
        ready_after: Option<usize>,
        fail: bool,
        queries: Cell<usize>,
    }

    impl StatusSource {
        fn new(ready_after: Option<usize>) -> Self {
            Self {
                ready_after,
                fail: false,
                queries: Cell::new(0),
            }
        }
    }

    fn ready_status() -> ContainerStatus {
        serde_json::from_str(
            r#"{"state": {"status": "Running", "network": {
                "eth0": {"state": "up", "addresses": [{"family": "inet", "address": "10.0.0.2", "scope": "global"}]}
            }}}"#,
        )
        .unwrap()
    }

    impl ContainerManager for StatusSource {
        async fn launch(&self, _: &str, _: &str) -> Result<()> {
            unreachable!()
        }
        async fn stop(&self, _: &str) -> Result<()> {
            unreachable!()
        }
        async fn publish(&self, _: &str, _: &str) -> Result<()> {
            unreachable!()
        }
        async fn delete(&self, _: &str, _: bool) -> Result<()> {
            unreachable!()
        }
        async fn exec(&self, _: &str, _: &str) -> Result<()> {
            unreachable!()
        }
        async fn status(&self, _: &str) -> Result<ContainerStatus> {
            let n = self.queries.get() + 1;
            self.queries.set(n);
            if self.fail {
                return Err(BuildError::Cli(CliError::ExecutionFailed {
                    command: "lxc list".to_string(),
                    reason: "exit status 1".to_string(),
                }));
            }
            match self.ready_after {
                Some(k) if n >= k => Ok(ready_status()),
                _ => Ok(ContainerStatus::default()),
            }
        }
        async fn export_image(&self, _: &str, _: &Path) -> Result<()> {
            unreachable!()
        }
        async fn import_image(&self, _: &Path, _: &str) -> Result<()> {
            unreachable!()
        }
        async fn delete_image(&self, _: &str) -> Result<()> {
            unreachable!()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_first_query() {
        let source = StatusSource::new(Some(1));
        wait_for_network(&source, "build", &ReadinessConfig::default())
            .await
            .unwrap();
        assert_eq!(source.queries.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_several_polls() {
        let source = StatusSource::new(Some(5));
        let start = Instant::now();
        wait_for_network(&source, "build", &ReadinessConfig::default())
            .await
            .unwrap();
        assert_eq!(source.queries.get(), 5);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_deadline() {
        let source = StatusSource::new(None);
        let config = ReadinessConfig {
            interval: Duration::from_secs(1),
            deadline: Duration::from_secs(10),
        };
        let start = Instant::now();
        let err = wait_for_network(&source, "build", &config)
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        let elapsed = start.elapsed();
        assert!(elapsed >= config.deadline);
        assert!(elapsed < config.deadline + config.interval);
        assert_eq!(source.queries.get(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_failure_is_not_retried() {
        let mut source = StatusSource::new(None);
        source.fail = true;
        let err = wait_for_network(&source, "build", &ReadinessConfig::default())
            .await
            .unwrap_err();
        assert!(!err.is_timeout());
        assert_eq!(source.queries.get(), 1);
    }
}
