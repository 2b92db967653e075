//! In-container customization.

use crate::error::Result;
use crate::lxd::ContainerManager;

/// Commands run inside the build container, in order.
pub const DEFAULT_CUSTOMIZATION: &[&str] = &[
    "yum install -y openssh-server redhat-lsb-core cloud-init",
    // set_hostname/update_hostname conflict with the guest's SELinux policy.
    r"sed -i -E 's/.*(set|update)_hostname.*/#\0/' /etc/cloud/cloud.cfg",
];

/// Runs each command through the container's shell, stopping at the first
/// failure.
pub async fn customize_container<M: ContainerManager>(
    manager: &M,
    container: &str,
    commands: &[String],
) -> Result<()> {
    for command in commands {
        manager.exec(container, command).await?;
    }
    Ok(())
}
