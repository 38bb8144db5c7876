//! Wire types for the CBS disk API.
//!
//! The API speaks PascalCase JSON. Requests are assembled from validated
//! controller types and replies are normalised into [`DiskSnapshot`] values
//! before they leave this module.

use serde::{Deserialize, Serialize};

use crate::gateway::{DiskSnapshot, DiskSpec, DiskState};
use crate::params::{Billing, ENCRYPT_ENABLED};

/// Request body for `POST /disks`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct CreateDisksRequest {
    /// Idempotency token; the API replays the original assignment for a
    /// token it has already honoured.
    pub client_token: String,
    /// Storage media class wire token.
    pub disk_type: String,
    /// Billing model wire token.
    pub disk_charge_type: String,
    /// Prepaid term, present only for prepaid billing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_charge_prepaid: Option<DiskChargePrepaid>,
    /// Requested size in whole gibibytes.
    pub disk_size: u64,
    /// Encryption marker, present only for encrypted disks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypt: Option<String>,
    /// Placement of the new disk.
    pub placement: Placement,
}

impl CreateDisksRequest {
    pub(super) fn from_spec(spec: &DiskSpec) -> Self {
        let disk_charge_prepaid = match spec.params.billing {
            Billing::PostpaidByHour => None,
            Billing::Prepaid {
                period_months,
                renew,
            } => Some(DiskChargePrepaid {
                period: u64::from(period_months),
                renew_flag: renew.as_str().to_owned(),
            }),
        };

        Self {
            client_token: spec.client_token.clone(),
            disk_type: spec.params.class.as_str().to_owned(),
            disk_charge_type: spec.params.billing.charge_type().as_str().to_owned(),
            disk_charge_prepaid,
            disk_size: spec.size_gib,
            encrypt: spec.params.encrypted.then(|| ENCRYPT_ENABLED.to_owned()),
            placement: Placement {
                zone: spec.zone.clone(),
            },
        }
    }
}

/// Prepaid billing terms attached to a create request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DiskChargePrepaid {
    /// Term length in months.
    pub period: u64,
    /// Renewal policy wire token.
    pub renew_flag: String,
}

/// Placement of a disk within the provider's topology.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct Placement {
    /// Availability zone identifier.
    pub zone: String,
}

/// Reply body for `POST /disks`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct CreateDisksResponse {
    /// Identifiers assigned to the request, possibly empty.
    #[serde(default)]
    pub disk_id_set: Vec<String>,
}

/// Request body for `POST /disks/describe`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DescribeDisksRequest {
    /// Identifiers to look up.
    pub disk_ids: Vec<String>,
}

impl DescribeDisksRequest {
    pub(super) fn for_disk(disk_id: &str) -> Self {
        Self {
            disk_ids: vec![disk_id.to_owned()],
        }
    }
}

/// Reply body for `POST /disks/describe`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DescribeDisksResponse {
    /// Disks matching the request, absent identifiers omitted.
    #[serde(default)]
    pub disk_set: Vec<DiskRecord>,
}

/// One disk as reported by the describe endpoint.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DiskRecord {
    /// Provider-assigned identifier.
    pub disk_id: String,
    /// Provisioned size in whole gibibytes.
    pub disk_size: u64,
    /// Lifecycle state wire token.
    pub disk_state: String,
    /// Attached instance; the API reports an empty string for idle disks.
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl DiskRecord {
    pub(super) fn into_snapshot(self) -> DiskSnapshot {
        let instance_id = self.instance_id.filter(|id| !id.is_empty());
        DiskSnapshot {
            id: self.disk_id,
            size_gib: self.disk_size,
            state: DiskState::from(self.disk_state),
            instance_id,
        }
    }
}

/// Request body for `POST /disks/attach`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct AttachDisksRequest {
    /// Identifiers of the disks to attach.
    pub disk_ids: Vec<String>,
    /// Instance to attach them to.
    pub instance_id: String,
}

impl AttachDisksRequest {
    pub(super) fn for_disk(disk_id: &str, instance_id: &str) -> Self {
        Self {
            disk_ids: vec![disk_id.to_owned()],
            instance_id: instance_id.to_owned(),
        }
    }
}

/// Request body for `POST /disks/detach`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DetachDisksRequest {
    /// Identifiers of the disks to detach.
    pub disk_ids: Vec<String>,
}

impl DetachDisksRequest {
    pub(super) fn for_disk(disk_id: &str) -> Self {
        Self {
            disk_ids: vec![disk_id.to_owned()],
        }
    }
}

/// Request body for `POST /disks/terminate`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct TerminateDisksRequest {
    /// Identifiers of the disks to destroy.
    pub disk_ids: Vec<String>,
}

impl TerminateDisksRequest {
    pub(super) fn for_disk(disk_id: &str) -> Self {
        Self {
            disk_ids: vec![disk_id.to_owned()],
        }
    }
}
