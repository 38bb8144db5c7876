//! Lifecycle orchestration for provider-backed block volumes.
//!
//! The controller turns the provider's eventually-consistent disk API into
//! synchronous lifecycle calls: each operation validates its input, issues
//! the provider call, and then polls until the disk reaches the state the
//! operation promises, or a deadline passes. Mutating operations on the
//! same volume are serialized through a per-volume lock, while the
//! provider's idempotency token covers concurrent creates of the same name.

use std::time::Duration;

use crate::gateway::{DiskGateway, DiskSnapshot};
use crate::params::ParamTable;
use crate::poll::{PollTimedOut, poll_until};

mod capability;
mod create;
mod delete;
mod error;
mod locks;
mod publish;
mod unpublish;

pub use capability::{CONTROLLER_CAPABILITIES, ControllerCapability};
pub use error::{ControllerError, ErrorCode};

use locks::VolumeLocks;

/// Interval between state probes while waiting on the provider.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How long an operation waits for the provider to settle before giving up.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Drives volume lifecycle operations against a [`DiskGateway`].
pub struct VolumeController<G> {
    gateway: G,
    zone: String,
    params: ParamTable,
    poll_interval: Duration,
    wait_timeout: Duration,
    locks: VolumeLocks,
}

impl<G> VolumeController<G>
where
    G: DiskGateway,
{
    /// Creates a controller that places volumes in the given zone.
    #[must_use]
    pub fn new(gateway: G, zone: impl Into<String>) -> Self {
        Self {
            gateway,
            zone: zone.into(),
            params: ParamTable::provider_default(),
            poll_interval: POLL_INTERVAL,
            wait_timeout: WAIT_TIMEOUT,
            locks: VolumeLocks::new(),
        }
    }

    /// Overrides the probe interval, primarily used by tests.
    #[must_use]
    pub const fn with_poll_interval(mut self, value: Duration) -> Self {
        self.poll_interval = value;
        self
    }

    /// Overrides the settling deadline, primarily used by tests.
    #[must_use]
    pub const fn with_wait_timeout(mut self, value: Duration) -> Self {
        self.wait_timeout = value;
        self
    }

    /// Overrides the accepted parameter table, primarily used by tests.
    #[must_use]
    pub const fn with_param_table(mut self, value: ParamTable) -> Self {
        self.params = value;
        self
    }

    /// Returns the gateway this controller drives, primarily used by tests.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    async fn wait_for_disk<Settled>(
        &self,
        disk_id: &str,
        settled: Settled,
    ) -> Result<DiskSnapshot, PollTimedOut>
    where
        Settled: FnMut(&DiskSnapshot) -> bool,
    {
        poll_until(
            self.poll_interval,
            self.wait_timeout,
            || self.gateway.describe_disk(disk_id),
            settled,
        )
        .await
    }
}

#[cfg(test)]
mod tests;
