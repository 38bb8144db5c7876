//! Volume attachment flow.

use tracing::{debug, info};

use crate::gateway::DiskGateway;
use crate::volume::VolumeCapability;

use super::{ControllerError, VolumeController};

impl<G> VolumeController<G>
where
    G: DiskGateway,
{
    /// Attaches a volume to an instance and waits for the attachment to
    /// converge.
    ///
    /// A volume already attached to the requested instance is a no-op
    /// success; one attached to any other instance is refused rather than
    /// force-detached. The capability is only checked for presence, since
    /// everything the driver can provision is attachable the same way.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::MissingVolumeId`],
    /// [`ControllerError::MissingNodeId`], or
    /// [`ControllerError::MissingCapability`] for incomplete requests,
    /// [`ControllerError::NotFound`] when the disk does not exist,
    /// [`ControllerError::AttachedElsewhere`] when it is attached to a
    /// different instance, [`ControllerError::Gateway`] when a provider call
    /// fails, and [`ControllerError::AttachTimedOut`] when the attachment
    /// never converges.
    pub async fn publish_volume(
        &self,
        volume_id: &str,
        node_id: &str,
        capability: Option<&VolumeCapability>,
    ) -> Result<(), ControllerError<G::Error>> {
        if volume_id.is_empty() {
            return Err(ControllerError::MissingVolumeId);
        }
        if node_id.is_empty() {
            return Err(ControllerError::MissingNodeId);
        }
        if capability.is_none() {
            return Err(ControllerError::MissingCapability);
        }
        let _guard = self.locks.acquire(volume_id).await;

        let existing = self
            .gateway
            .describe_disk(volume_id)
            .await
            .map_err(|source| ControllerError::Gateway {
                action: "describe disks",
                source,
            })?;
        let Some(current) = existing else {
            return Err(ControllerError::NotFound {
                disk_id: volume_id.to_owned(),
            });
        };

        if current.attached_to(node_id) {
            debug!(
                disk_id = volume_id,
                node_id, "disk already attached to the requested instance"
            );
            return Ok(());
        }
        if current.state.is_attached() {
            return Err(ControllerError::AttachedElsewhere {
                disk_id: volume_id.to_owned(),
            });
        }

        self.gateway
            .attach_disk(volume_id, node_id)
            .await
            .map_err(|source| ControllerError::Gateway {
                action: "attach disks",
                source,
            })?;

        self.wait_for_disk(volume_id, |probe| probe.state.is_attached())
            .await
            .map_err(|source| ControllerError::AttachTimedOut {
                disk_id: volume_id.to_owned(),
                source,
            })?;

        info!(disk_id = volume_id, node_id, "volume attached");
        Ok(())
    }
}
