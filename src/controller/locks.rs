//! Per-volume serialization of conflicting lifecycle operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Hands out one async mutex per volume identifier.
///
/// The provider's records are the source of truth for volume state, but it
/// offers no ordering guarantee when an attach and a detach for the same
/// disk overlap. Holding the volume's lock for the duration of each
/// mutating operation keeps those calls sequential while operations on
/// different volumes proceed concurrently. Entries are pruned once nothing
/// holds or awaits them.
#[derive(Debug, Default)]
pub(super) struct VolumeLocks {
    entries: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl VolumeLocks {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for a volume, creating it on first use.
    pub(super) async fn acquire(&self, volume_id: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(entries.entry(volume_id.to_owned()).or_default())
        };
        entry.lock_owned().await
    }
}
