//! Full build sequence against a fake LXD.

mod common;

use common::{FakeLxd, entries, tar_gz};
use lxd_image_builder::BuildError;
use lxd_image_builder::builder::{BuildConfig, ImageBuilder};
use std::time::Duration;

fn exported_image() -> Vec<u8> {
    tar_gz(&[
        ("metadata.yaml", b"architecture: x86_64\ntemplates: {}\n"),
        ("rootfs/etc/hostname", b"localhost\n"),
    ])
}

#[tokio::test]
async fn test_build_runs_every_step_in_order() {
    let lxd = FakeLxd::with_export("abc123.tar.gz", exported_image());
    let config = BuildConfig::new("images:centos/7", "centos7/cloud", false);

    ImageBuilder::new(&lxd, config).build().await.unwrap();

    let calls = lxd.calls();
    assert!(calls[0].starts_with("launch images:centos/7 lxd-image-build-"));
    assert_eq!(
        &calls[1..],
        &[
            "status",
            "exec yum",
            "exec sed",
            "stop",
            "publish centos7/cloud",
            "delete force=false",
            "export centos7/cloud",
            "import centos7/cloud",
            "delete_image abc123",
        ]
    );

    let imported = lxd.imported.borrow().clone().unwrap();
    let templates = entries(&imported)
        .into_iter()
        .filter(|(n, _)| n.starts_with("templates/"))
        .count();
    assert_eq!(templates, 4);
}

#[tokio::test]
async fn test_failed_customization_force_deletes_container() {
    let mut lxd = FakeLxd::with_export("abc123.tar.gz", exported_image());
    lxd.fail_on = Some("exec");
    let config = BuildConfig::new("images:centos/7", "centos7/cloud", false);

    let err = ImageBuilder::new(&lxd, config).build().await.unwrap_err();

    assert!(matches!(err, BuildError::Cli(_)), "{err}");
    let calls = lxd.calls();
    assert_eq!(&calls[1..], &["status", "exec yum", "delete force=true"]);
}

#[tokio::test]
async fn test_keep_leaves_container_after_failure() {
    let mut lxd = FakeLxd::with_export("abc123.tar.gz", exported_image());
    lxd.fail_on = Some("stop");
    let config = BuildConfig::new("images:centos/7", "centos7/cloud", true);

    assert!(ImageBuilder::new(&lxd, config).build().await.is_err());

    let calls = lxd.calls();
    assert_eq!(calls.last().map(String::as_str), Some("stop"));
    assert!(!calls.iter().any(|c| c.starts_with("delete")));
}

#[tokio::test]
async fn test_rewrite_failure_does_not_delete_published_container_twice() {
    let lxd = FakeLxd::with_export(
        "abc123.tar.gz",
        tar_gz(&[("rootfs/etc/hostname", b"localhost\n")]),
    );
    let config = BuildConfig::new("images:centos/7", "centos7/cloud", false);

    let err = ImageBuilder::new(&lxd, config).build().await.unwrap_err();

    assert!(matches!(err, BuildError::Metadata(_)), "{err}");
    let deletes: Vec<_> = lxd
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("delete"))
        .collect();
    assert_eq!(deletes, vec!["delete force=false".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_network_timeout_aborts_build() {
    let mut lxd = FakeLxd::with_export("abc123.tar.gz", exported_image());
    lxd.network_ready = false;
    let mut config = BuildConfig::new("images:centos/7", "centos7/cloud", false);
    config.readiness.deadline = Duration::from_secs(5);

    let start = tokio::time::Instant::now();
    let err = ImageBuilder::new(&lxd, config).build().await.unwrap_err();

    assert!(err.is_timeout(), "{err}");
    assert!(start.elapsed() >= Duration::from_secs(5));
    let calls = lxd.calls();
    assert_eq!(calls.iter().filter(|c| *c == "status").count(), 6);
    assert_eq!(calls.last().map(String::as_str), Some("delete force=true"));
}
