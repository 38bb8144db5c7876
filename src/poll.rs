//! Bounded polling of eventually-consistent provider state.
//!
//! The provider acknowledges lifecycle operations before they finish, so the
//! controller repeatedly probes for the state it is waiting on. The loop
//! here is deliberately dumb: fixed interval, fixed overall timeout, no
//! backoff, matching the provider's own guidance for its control plane.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Raised when a poll loop's deadline passes without the state settling.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("state did not settle within {waited:?}")]
pub struct PollTimedOut {
    /// How long the loop waited before giving up.
    pub waited: Duration,
}

/// Probes for a state snapshot until one satisfies the predicate.
///
/// Each round sleeps for `interval` and then calls `fetch`. A probe that
/// fails or finds nothing keeps the loop alive; only the deadline ends it.
/// Because the loop sleeps before probing, the timeout surfaces at most one
/// interval after `timeout` has elapsed, and the first probe happens one
/// interval in, never immediately.
///
/// # Errors
///
/// Returns [`PollTimedOut`] when no snapshot satisfies `settled` before the
/// deadline. Probe errors are never returned; they are logged and retried.
pub async fn poll_until<T, E, Fut, Fetch, Settled>(
    interval: Duration,
    timeout: Duration,
    mut fetch: Fetch,
    mut settled: Settled,
) -> Result<T, PollTimedOut>
where
    E: fmt::Display,
    Fut: Future<Output = Result<Option<T>, E>>,
    Fetch: FnMut() -> Fut,
    Settled: FnMut(&T) -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() <= deadline {
        sleep(interval).await;
        match fetch().await {
            Ok(Some(snapshot)) => {
                if settled(&snapshot) {
                    return Ok(snapshot);
                }
            }
            Ok(None) => {}
            Err(err) => {
                debug!(error = %err, "state probe failed; retrying");
            }
        }
    }

    Err(PollTimedOut { waited: timeout })
}
