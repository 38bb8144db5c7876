//! Volume deletion flow.

use tracing::{debug, info};

use crate::gateway::DiskGateway;

use super::{ControllerError, VolumeController};

impl<G> VolumeController<G>
where
    G: DiskGateway,
{
    /// Deletes a volume, treating an already-absent disk as success.
    ///
    /// Termination is fire-and-forget: once the provider accepts the
    /// request the call returns without waiting for the disk to vanish,
    /// unlike create and publish which poll for convergence.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::MissingVolumeId`] for an empty identifier
    /// and [`ControllerError::Gateway`] when describe or terminate fails.
    pub async fn delete_volume(&self, volume_id: &str) -> Result<(), ControllerError<G::Error>> {
        if volume_id.is_empty() {
            return Err(ControllerError::MissingVolumeId);
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
        if existing.is_none() {
            debug!(disk_id = volume_id, "disk already absent; delete is a no-op");
            return Ok(());
        }

        self.gateway
            .terminate_disk(volume_id)
            .await
            .map_err(|source| ControllerError::Gateway {
                action: "terminate disks",
                source,
            })?;
        info!(disk_id = volume_id, "volume termination accepted");
        Ok(())
    }
}
