//! Volume detachment flow.

use tracing::{debug, info};

use crate::gateway::DiskGateway;

use super::{ControllerError, VolumeController};

impl<G> VolumeController<G>
where
    G: DiskGateway,
{
    /// Detaches a volume and waits for the detachment to converge.
    ///
    /// A volume the provider already reports as unattached is a no-op
    /// success. The node identifier is required but not matched against the
    /// current attachment; the disk is detached from wherever it is.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::MissingVolumeId`] or
    /// [`ControllerError::MissingNodeId`] for incomplete requests,
    /// [`ControllerError::NotFound`] when the disk does not exist,
    /// [`ControllerError::Gateway`] when a provider call fails, and
    /// [`ControllerError::DetachTimedOut`] when the detachment never
    /// converges.
    pub async fn unpublish_volume(
        &self,
        volume_id: &str,
        node_id: &str,
    ) -> Result<(), ControllerError<G::Error>> {
        if volume_id.is_empty() {
            return Err(ControllerError::MissingVolumeId);
        }
        if node_id.is_empty() {
            return Err(ControllerError::MissingNodeId);
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

        if current.state.is_unattached() {
            debug!(disk_id = volume_id, "disk already unattached");
            return Ok(());
        }

        self.gateway
            .detach_disk(volume_id)
            .await
            .map_err(|source| ControllerError::Gateway {
                action: "detach disks",
                source,
            })?;

        self.wait_for_disk(volume_id, |probe| probe.state.is_unattached())
            .await
            .map_err(|source| ControllerError::DetachTimedOut {
                disk_id: volume_id.to_owned(),
                source,
            })?;

        info!(disk_id = volume_id, "volume detached");
        Ok(())
    }
}
