//! Shared fixtures for volume controller BDD scenarios.

use std::time::Duration;

use rstest::fixture;
use ruslan::test_support::{ScriptedGateway, ScriptedGatewayError};
use ruslan::{ControllerError, Volume, VolumeController};

/// Scenarios poll quickly so waits on disk state finish in milliseconds.
const SCENARIO_POLL_INTERVAL: Duration = Duration::from_millis(2);
const SCENARIO_WAIT_TIMEOUT: Duration = Duration::from_millis(200);

/// Result of the driving step, kept for the assertion steps.
#[derive(Debug)]
pub enum LifecycleOutcome {
    /// A provisioning attempt and the volume it produced.
    Provisioned(Result<Volume, ControllerError<ScriptedGatewayError>>),
    /// A delete, publish, or unpublish attempt.
    Completed(Result<(), ControllerError<ScriptedGatewayError>>),
}

/// State threaded through a scenario's steps.
pub struct LifecycleContext {
    pub gateway: ScriptedGateway,
    pub controller: VolumeController<ScriptedGateway>,
    pub outcome: Option<LifecycleOutcome>,
}

#[fixture]
pub fn lifecycle_context() -> LifecycleContext {
    let gateway = ScriptedGateway::new();
    let controller = VolumeController::new(gateway.clone(), "ap-guangzhou-3")
        .with_poll_interval(SCENARIO_POLL_INTERVAL)
        .with_wait_timeout(SCENARIO_WAIT_TIMEOUT);
    LifecycleContext {
        gateway,
        controller,
        outcome: None,
    }
}
