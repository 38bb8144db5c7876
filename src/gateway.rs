//! Gateway abstraction over the provider's disk control plane.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::params::DiskParams;

/// Wire token the provider reports for a disk attached to an instance.
pub const STATE_ATTACHED: &str = "ATTACHED";

/// Wire token the provider reports for a provisioned, unattached disk.
pub const STATE_UNATTACHED: &str = "UNATTACHED";

/// Provider-reported lifecycle state of a disk.
///
/// Anything other than [`STATE_ATTACHED`] or [`STATE_UNATTACHED`] is a
/// transitional state the provider moves disks through while an operation is
/// in flight; callers wait those out rather than acting on them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiskState(String);

impl DiskState {
    /// Wraps a provider wire token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw wire token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the provider reports the disk as attached to an instance.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.0 == STATE_ATTACHED
    }

    /// Whether the provider reports the disk as provisioned and idle.
    #[must_use]
    pub fn is_unattached(&self) -> bool {
        self.0 == STATE_UNATTACHED
    }

    /// Whether the disk has settled into either steady state.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.is_attached() || self.is_unattached()
    }
}

impl From<String> for DiskState {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DiskState {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for DiskState {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point-in-time description of a disk as reported by the provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiskSnapshot {
    /// Provider-assigned disk identifier.
    pub id: String,
    /// Provisioned size in whole gibibytes.
    pub size_gib: u64,
    /// Reported lifecycle state.
    pub state: DiskState,
    /// Instance the disk is attached to, when the provider reports one.
    pub instance_id: Option<String>,
}

impl DiskSnapshot {
    /// Whether the disk is currently attached to the named instance.
    #[must_use]
    pub fn attached_to(&self, instance_id: &str) -> bool {
        self.state.is_attached() && self.instance_id.as_deref() == Some(instance_id)
    }
}

/// Everything the provider needs to provision a disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiskSpec {
    /// Idempotency token. The provider returns the previously assigned disk
    /// when it has already honoured a create bearing the same token.
    pub client_token: String,
    /// Validated provisioning parameters.
    pub params: DiskParams,
    /// Requested size in whole gibibytes.
    pub size_gib: u64,
    /// Availability zone to place the disk in.
    pub zone: String,
}

/// Future returned by gateway operations.
pub type GatewayFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Minimal interface onto the provider's disk control plane.
///
/// Implementations translate each intent into a provider call and report the
/// outcome verbatim. Orchestration concerns, such as polling for settled
/// states and serializing conflicting operations, live above this trait.
pub trait DiskGateway {
    /// Provider specific error type returned by the gateway.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Asks the provider to provision a disk, returning the identifiers it
    /// assigned for the request.
    fn create_disk<'a>(&'a self, spec: &'a DiskSpec)
    -> GatewayFuture<'a, Vec<String>, Self::Error>;

    /// Fetches the current state of a disk, or `None` when the provider does
    /// not recognize the identifier.
    fn describe_disk<'a>(
        &'a self,
        disk_id: &'a str,
    ) -> GatewayFuture<'a, Option<DiskSnapshot>, Self::Error>;

    /// Asks the provider to attach a disk to an instance.
    fn attach_disk<'a>(
        &'a self,
        disk_id: &'a str,
        instance_id: &'a str,
    ) -> GatewayFuture<'a, (), Self::Error>;

    /// Asks the provider to detach a disk from wherever it is attached.
    fn detach_disk<'a>(&'a self, disk_id: &'a str) -> GatewayFuture<'a, (), Self::Error>;

    /// Asks the provider to destroy a disk.
    fn terminate_disk<'a>(&'a self, disk_id: &'a str) -> GatewayFuture<'a, (), Self::Error>;
}
