//! Static declaration of what this controller can and cannot do.

use crate::gateway::DiskGateway;

use super::{ControllerError, VolumeController};

/// A lifecycle capability the controller advertises to its transport.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControllerCapability {
    /// Volumes can be created and deleted.
    CreateDeleteVolume,
    /// Volumes can be attached to and detached from instances.
    PublishUnpublishVolume,
}

impl ControllerCapability {
    /// Returns the protocol wire name for this capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateDeleteVolume => "CREATE_DELETE_VOLUME",
            Self::PublishUnpublishVolume => "PUBLISH_UNPUBLISH_VOLUME",
        }
    }
}

/// The fixed capability set this controller reports.
pub const CONTROLLER_CAPABILITIES: &[ControllerCapability] = &[
    ControllerCapability::CreateDeleteVolume,
    ControllerCapability::PublishUnpublishVolume,
];

impl<G> VolumeController<G>
where
    G: DiskGateway,
{
    /// Reports the fixed set of supported lifecycle operations.
    #[must_use]
    pub const fn capabilities(&self) -> &'static [ControllerCapability] {
        CONTROLLER_CAPABILITIES
    }

    /// Refuses capability validation without touching the provider.
    ///
    /// # Errors
    ///
    /// Always returns [`ControllerError::Unsupported`].
    pub const fn validate_volume_capabilities(&self) -> Result<(), ControllerError<G::Error>> {
        Err(ControllerError::Unsupported {
            operation: "ValidateVolumeCapabilities",
        })
    }

    /// Refuses volume listing without touching the provider.
    ///
    /// # Errors
    ///
    /// Always returns [`ControllerError::Unsupported`].
    pub const fn list_volumes(&self) -> Result<(), ControllerError<G::Error>> {
        Err(ControllerError::Unsupported {
            operation: "ListVolumes",
        })
    }

    /// Refuses capacity queries without touching the provider.
    ///
    /// # Errors
    ///
    /// Always returns [`ControllerError::Unsupported`].
    pub const fn get_capacity(&self) -> Result<(), ControllerError<G::Error>> {
        Err(ControllerError::Unsupported {
            operation: "GetCapacity",
        })
    }

    /// Refuses volume expansion without touching the provider.
    ///
    /// # Errors
    ///
    /// Always returns [`ControllerError::Unsupported`].
    pub const fn expand_volume(&self) -> Result<(), ControllerError<G::Error>> {
        Err(ControllerError::Unsupported {
            operation: "ControllerExpandVolume",
        })
    }

    /// Refuses snapshot creation without touching the provider.
    ///
    /// # Errors
    ///
    /// Always returns [`ControllerError::Unsupported`].
    pub const fn create_snapshot(&self) -> Result<(), ControllerError<G::Error>> {
        Err(ControllerError::Unsupported {
            operation: "CreateSnapshot",
        })
    }

    /// Refuses snapshot deletion without touching the provider.
    ///
    /// # Errors
    ///
    /// Always returns [`ControllerError::Unsupported`].
    pub const fn delete_snapshot(&self) -> Result<(), ControllerError<G::Error>> {
        Err(ControllerError::Unsupported {
            operation: "DeleteSnapshot",
        })
    }

    /// Refuses snapshot listing without touching the provider.
    ///
    /// # Errors
    ///
    /// Always returns [`ControllerError::Unsupported`].
    pub const fn list_snapshots(&self) -> Result<(), ControllerError<G::Error>> {
        Err(ControllerError::Unsupported {
            operation: "ListSnapshots",
        })
    }
}
