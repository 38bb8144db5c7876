//! Error taxonomy shared by every controller operation.

use std::fmt;

use thiserror::Error;

use crate::params::ParamError;
use crate::poll::PollTimedOut;

/// Protocol-level classification of a controller failure.
///
/// Transports map these onto their own status vocabulary; the controller
/// guarantees the classification, not any particular encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// The request is malformed or asks for something out of vocabulary.
    InvalidArgument,
    /// The referenced volume does not exist where presence was required.
    NotFound,
    /// The volume exists but its current attachment conflicts with the
    /// request.
    FailedPrecondition,
    /// The provider or transport failed, or an accepted attach or detach
    /// never converged.
    Internal,
    /// A freshly created disk never settled before the deadline.
    DeadlineExceeded,
    /// The operation is deliberately not offered.
    Unimplemented,
}

impl ErrorCode {
    /// Returns the conventional wire name for this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::NotFound => "NotFound",
            Self::FailedPrecondition => "FailedPrecondition",
            Self::Internal => "Internal",
            Self::DeadlineExceeded => "DeadlineExceeded",
            Self::Unimplemented => "Unimplemented",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single controller operation.
///
/// No failure is fatal to the process; each one is scoped to the call that
/// produced it and classified by [`ControllerError::code`].
#[derive(Debug, Error)]
pub enum ControllerError<GatewayError>
where
    GatewayError: std::error::Error + 'static,
{
    /// Raised when provisioning parameters fail validation.
    #[error(transparent)]
    Validation(#[from] ParamError),
    /// Raised when an operation references an empty volume identifier.
    #[error("volume id is empty")]
    MissingVolumeId,
    /// Raised when publish or unpublish references an empty node identifier.
    #[error("node id is empty")]
    MissingNodeId,
    /// Raised when publish carries no capability.
    #[error("volume has no capabilities")]
    MissingCapability,
    /// Raised when the referenced volume does not exist.
    #[error("disk {disk_id} not found")]
    NotFound {
        /// The identifier the provider did not recognize.
        disk_id: String,
    },
    /// Raised when attach finds the volume on a different instance.
    #[error("disk {disk_id} is already attached to another instance")]
    AttachedElsewhere {
        /// The contested disk.
        disk_id: String,
    },
    /// Raised when a gateway call fails outright.
    #[error("{action} failed: {source}")]
    Gateway {
        /// The provider call that failed.
        action: &'static str,
        /// Provider-specific error.
        #[source]
        source: GatewayError,
    },
    /// Raised when the provider accepts a create but assigns no identifier.
    #[error("provider assigned no disk for create request {name:?}")]
    NoDiskAssigned {
        /// Idempotency name of the create request.
        name: String,
    },
    /// Raised when a freshly created disk never settles.
    #[error("disk {disk_id} was not ready before the deadline")]
    CreateTimedOut {
        /// The disk that never settled.
        disk_id: String,
        /// The exhausted poll.
        #[source]
        source: PollTimedOut,
    },
    /// Raised when an accepted attach never converges.
    #[error("disk {disk_id} was not attached before the deadline")]
    AttachTimedOut {
        /// The disk that never reached the attached state.
        disk_id: String,
        /// The exhausted poll.
        #[source]
        source: PollTimedOut,
    },
    /// Raised when an accepted detach never converges.
    #[error("disk {disk_id} was not detached before the deadline")]
    DetachTimedOut {
        /// The disk that never reached the unattached state.
        disk_id: String,
        /// The exhausted poll.
        #[source]
        source: PollTimedOut,
    },
    /// Raised for operations this driver deliberately does not offer.
    #[error("{operation} is not supported by this driver")]
    Unsupported {
        /// Protocol name of the refused operation.
        operation: &'static str,
    },
}

impl<GatewayError> ControllerError<GatewayError>
where
    GatewayError: std::error::Error + 'static,
{
    /// Classifies this failure for the transport layer.
    ///
    /// The two deadline shapes classify differently: a create that never
    /// settles is [`ErrorCode::DeadlineExceeded`], while attach and detach
    /// timeouts surface as [`ErrorCode::Internal`].
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_)
            | Self::MissingVolumeId
            | Self::MissingNodeId
            | Self::MissingCapability => ErrorCode::InvalidArgument,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::AttachedElsewhere { .. } => ErrorCode::FailedPrecondition,
            Self::Gateway { .. }
            | Self::NoDiskAssigned { .. }
            | Self::AttachTimedOut { .. }
            | Self::DetachTimedOut { .. } => ErrorCode::Internal,
            Self::CreateTimedOut { .. } => ErrorCode::DeadlineExceeded,
            Self::Unsupported { .. } => ErrorCode::Unimplemented,
        }
    }
}
