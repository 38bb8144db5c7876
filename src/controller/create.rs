//! Volume provisioning flow.

use tracing::info;

use crate::gateway::{DiskGateway, DiskSpec};
use crate::params::validate_request;
use crate::volume::{CreateVolumeRequest, Volume, gib_to_bytes, whole_gib};

use super::{ControllerError, VolumeController};

impl<G> VolumeController<G>
where
    G: DiskGateway,
{
    /// Provisions a volume and waits until the provider reports it usable.
    ///
    /// The request name travels to the provider as an idempotency token, so
    /// retrying an identical request after a success yields the original
    /// disk rather than a second one. A freshly created disk may surface as
    /// unattached or already attached; both count as settled. The returned
    /// capacity is the provider's own figure and may be smaller than the
    /// request after rounding down to whole gibibytes.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Validation`] before any provider call when
    /// the request is malformed, [`ControllerError::Gateway`] when the
    /// provider rejects a call, [`ControllerError::NoDiskAssigned`] when the
    /// create is accepted without an identifier, and
    /// [`ControllerError::CreateTimedOut`] when the disk never settles.
    pub async fn create_volume(
        &self,
        request: &CreateVolumeRequest,
    ) -> Result<Volume, ControllerError<G::Error>> {
        let params = validate_request(&self.params, request)?;

        let spec = DiskSpec {
            client_token: request.name.clone(),
            params,
            size_gib: whole_gib(request.capacity_bytes),
            zone: self.zone.clone(),
        };
        let assigned = self
            .gateway
            .create_disk(&spec)
            .await
            .map_err(|source| ControllerError::Gateway {
                action: "create disks",
                source,
            })?;
        let Some(disk_id) = assigned.into_iter().next() else {
            return Err(ControllerError::NoDiskAssigned {
                name: request.name.clone(),
            });
        };

        let settled = self
            .wait_for_disk(&disk_id, |probe| probe.state.is_settled())
            .await
            .map_err(|source| ControllerError::CreateTimedOut {
                disk_id: disk_id.clone(),
                source,
            })?;

        info!(
            disk_id = %settled.id,
            size_gib = settled.size_gib,
            state = %settled.state,
            "volume provisioned"
        );
        Ok(Volume {
            id: settled.id,
            capacity_bytes: gib_to_bytes(settled.size_gib),
        })
    }
}
