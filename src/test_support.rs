//! Test support utilities shared across unit and integration tests.

use std::collections::{BTreeSet, HashMap};
use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use crate::gateway::{
    DiskGateway, DiskSnapshot, DiskSpec, DiskState, GatewayFuture, STATE_ATTACHED,
    STATE_UNATTACHED,
};

/// Error returned by [`ScriptedGateway`] when a call is scripted to fail.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{message}")]
pub struct ScriptedGatewayError {
    /// Scripted failure text.
    pub message: String,
}

impl ScriptedGatewayError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
struct GatewayState {
    disks: HashMap<String, DiskSnapshot>,
    tokens: HashMap<String, String>,
    next_serial: u32,
    create_calls: u32,
    describe_calls: u32,
    attach_calls: u32,
    detach_calls: u32,
    terminate_calls: u32,
    last_spec: Option<DiskSpec>,
    fail_create: Option<String>,
    fail_attach: Option<String>,
    fail_detach: Option<String>,
    fail_terminate: Option<String>,
    failing_describes: u32,
    assign_no_identifiers: bool,
    stall_create: bool,
    stall_attach: bool,
    stall_detach: bool,
}

/// Scripted disk gateway backed by an in-memory disk table.
///
/// Mimics the provider's observable behaviour: creates deduplicate on the
/// idempotency token, attachments move disks between the steady wire
/// states, and every call is counted so tests can assert which provider
/// operations an orchestration path issued. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct ScriptedGateway {
    state: Arc<StdMutex<GatewayState>>,
}

impl ScriptedGateway {
    /// Creates a gateway with no disks and nothing scripted to fail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds a disk snapshot directly into the provider table.
    pub fn seed_disk(&self, snapshot: DiskSnapshot) {
        let mut state = self.lock();
        state.disks.insert(snapshot.id.clone(), snapshot);
    }

    /// Seeds an unattached disk of the given size.
    pub fn seed_unattached(&self, disk_id: &str, size_gib: u64) {
        self.seed_disk(DiskSnapshot {
            id: disk_id.to_owned(),
            size_gib,
            state: DiskState::from(STATE_UNATTACHED),
            instance_id: None,
        });
    }

    /// Seeds a disk already attached to an instance.
    pub fn seed_attached(&self, disk_id: &str, size_gib: u64, instance_id: &str) {
        self.seed_disk(DiskSnapshot {
            id: disk_id.to_owned(),
            size_gib,
            state: DiskState::from(STATE_ATTACHED),
            instance_id: Some(instance_id.to_owned()),
        });
    }

    /// Returns the current snapshot for a disk, if it exists.
    #[must_use]
    pub fn disk(&self, disk_id: &str) -> Option<DiskSnapshot> {
        self.lock().disks.get(disk_id).cloned()
    }

    /// Returns the spec passed to the most recent create call.
    #[must_use]
    pub fn last_create_spec(&self) -> Option<DiskSpec> {
        self.lock().last_spec.clone()
    }

    /// Number of create calls observed.
    #[must_use]
    pub fn create_calls(&self) -> u32 {
        self.lock().create_calls
    }

    /// Number of describe calls observed.
    #[must_use]
    pub fn describe_calls(&self) -> u32 {
        self.lock().describe_calls
    }

    /// Number of attach calls observed.
    #[must_use]
    pub fn attach_calls(&self) -> u32 {
        self.lock().attach_calls
    }

    /// Number of detach calls observed.
    #[must_use]
    pub fn detach_calls(&self) -> u32 {
        self.lock().detach_calls
    }

    /// Number of terminate calls observed.
    #[must_use]
    pub fn terminate_calls(&self) -> u32 {
        self.lock().terminate_calls
    }

    /// Scripts every create call to fail with the given message.
    pub fn fail_creations(&self, message: &str) {
        self.lock().fail_create = Some(message.to_owned());
    }

    /// Scripts every attach call to fail with the given message.
    pub fn fail_attachments(&self, message: &str) {
        self.lock().fail_attach = Some(message.to_owned());
    }

    /// Scripts every detach call to fail with the given message.
    pub fn fail_detachments(&self, message: &str) {
        self.lock().fail_detach = Some(message.to_owned());
    }

    /// Scripts every terminate call to fail with the given message.
    pub fn fail_terminations(&self, message: &str) {
        self.lock().fail_terminate = Some(message.to_owned());
    }

    /// Scripts the next `count` describe calls to fail transiently.
    pub fn fail_describes(&self, count: u32) {
        self.lock().failing_describes = count;
    }

    /// Scripts create calls to succeed while assigning no identifiers.
    pub fn assign_no_identifiers(&self) {
        self.lock().assign_no_identifiers = true;
    }

    /// Scripts created disks to stay in a transitional state forever.
    pub fn stall_creations(&self) {
        self.lock().stall_create = true;
    }

    /// Scripts attachments to accept but never converge.
    pub fn stall_attachments(&self) {
        self.lock().stall_attach = true;
    }

    /// Scripts detachments to accept but never converge.
    pub fn stall_detachments(&self) {
        self.lock().stall_detach = true;
    }
}

impl DiskGateway for ScriptedGateway {
    type Error = ScriptedGatewayError;

    fn create_disk<'a>(
        &'a self,
        spec: &'a DiskSpec,
    ) -> GatewayFuture<'a, Vec<String>, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.create_calls += 1;
            state.last_spec = Some(spec.clone());
            if let Some(message) = &state.fail_create {
                return Err(ScriptedGatewayError::new(message));
            }
            if state.assign_no_identifiers {
                return Ok(Vec::new());
            }
            if let Some(existing) = state.tokens.get(&spec.client_token) {
                return Ok(vec![existing.clone()]);
            }

            state.next_serial += 1;
            let serial = state.next_serial;
            let disk_id = format!("disk-{serial}");
            let initial = if state.stall_create {
                DiskState::from("CREATING")
            } else {
                DiskState::from(STATE_UNATTACHED)
            };
            state.disks.insert(
                disk_id.clone(),
                DiskSnapshot {
                    id: disk_id.clone(),
                    size_gib: spec.size_gib,
                    state: initial,
                    instance_id: None,
                },
            );
            state
                .tokens
                .insert(spec.client_token.clone(), disk_id.clone());
            Ok(vec![disk_id])
        })
    }

    fn describe_disk<'a>(
        &'a self,
        disk_id: &'a str,
    ) -> GatewayFuture<'a, Option<DiskSnapshot>, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.describe_calls += 1;
            if state.failing_describes > 0 {
                state.failing_describes -= 1;
                return Err(ScriptedGatewayError::new("scripted transient describe"));
            }
            Ok(state.disks.get(disk_id).cloned())
        })
    }

    fn attach_disk<'a>(
        &'a self,
        disk_id: &'a str,
        instance_id: &'a str,
    ) -> GatewayFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.attach_calls += 1;
            if let Some(message) = &state.fail_attach {
                return Err(ScriptedGatewayError::new(message));
            }
            let stalled = state.stall_attach;
            let Some(disk) = state.disks.get_mut(disk_id) else {
                return Err(ScriptedGatewayError::new(format!(
                    "no scripted disk {disk_id}"
                )));
            };
            if stalled {
                disk.state = DiskState::from("ATTACHING");
            } else {
                disk.state = DiskState::from(STATE_ATTACHED);
                disk.instance_id = Some(instance_id.to_owned());
            }
            Ok(())
        })
    }

    fn detach_disk<'a>(&'a self, disk_id: &'a str) -> GatewayFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.detach_calls += 1;
            if let Some(message) = &state.fail_detach {
                return Err(ScriptedGatewayError::new(message));
            }
            let stalled = state.stall_detach;
            let Some(disk) = state.disks.get_mut(disk_id) else {
                return Err(ScriptedGatewayError::new(format!(
                    "no scripted disk {disk_id}"
                )));
            };
            if stalled {
                disk.state = DiskState::from("DETACHING");
            } else {
                disk.state = DiskState::from(STATE_UNATTACHED);
                disk.instance_id = None;
            }
            Ok(())
        })
    }

    fn terminate_disk<'a>(&'a self, disk_id: &'a str) -> GatewayFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.terminate_calls += 1;
            if let Some(message) = &state.fail_terminate {
                return Err(ScriptedGatewayError::new(message));
            }
            if state.disks.remove(disk_id).is_none() {
                return Err(ScriptedGatewayError::new(format!(
                    "no scripted disk {disk_id}"
                )));
            }
            state.tokens.retain(|_, id| id != disk_id);
            Ok(())
        })
    }
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: Mutex<()> = Mutex::const_new(());

/// Guard that holds the env mutex and restores variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets multiple environment variables while holding the global mutex.
    pub async fn set_vars(pairs: &[(&str, &str)]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs.iter().all(|(key, _)| seen.insert(*key))
            },
            "duplicate environment variable keys passed to EnvGuard::set_vars"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let old = env::var_os(key);
            // SAFETY: mutation is serialised by `ENV_LOCK`.
            unsafe { env::set_var(key, value) };
            previous.push(((*key).to_owned(), old));
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: mutation is serialised by the still-held `_guard`.
            unsafe {
                match old {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
