//! BDD step definitions for the volume lifecycle.

use rstest_bdd_macros::{given, then, when};
use ruslan::volume::GIB;
use ruslan::{CreateVolumeRequest, VolumeCapability};
use tokio::runtime::Runtime;

use super::test_helpers::{LifecycleContext, LifecycleOutcome};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn runtime() -> Result<Runtime, StepError> {
    Runtime::new().map_err(|err| StepError::Runtime(err.to_string()))
}

#[given("a controller backed by a scripted gateway")]
fn scripted_controller(lifecycle_context: LifecycleContext) -> LifecycleContext {
    lifecycle_context
}

#[given("a disk \"{disk_id}\" of \"{size_gib}\" GiB sitting unattached")]
fn unattached_disk(
    lifecycle_context: LifecycleContext,
    disk_id: String,
    size_gib: u64,
) -> LifecycleContext {
    lifecycle_context.gateway.seed_unattached(&disk_id, size_gib);
    lifecycle_context
}

#[given("a disk \"{disk_id}\" of \"{size_gib}\" GiB attached to \"{instance_id}\"")]
fn attached_disk(
    lifecycle_context: LifecycleContext,
    disk_id: String,
    size_gib: u64,
    instance_id: String,
) -> LifecycleContext {
    lifecycle_context
        .gateway
        .seed_attached(&disk_id, size_gib, &instance_id);
    lifecycle_context
}

#[when("I create a volume named \"{name}\" of \"{size_gib}\" GiB")]
fn create_volume(
    lifecycle_context: LifecycleContext,
    name: String,
    size_gib: u64,
) -> Result<LifecycleContext, StepError> {
    let runtime = runtime()?;
    let request = CreateVolumeRequest::builder()
        .name(name)
        .capacity_bytes(size_gib * GIB)
        .capability(VolumeCapability::single_writer_mount())
        .build();
    let LifecycleContext {
        gateway,
        controller,
        ..
    } = lifecycle_context;
    let result = runtime.block_on(controller.create_volume(&request));
    Ok(LifecycleContext {
        gateway,
        controller,
        outcome: Some(LifecycleOutcome::Provisioned(result)),
    })
}

#[when("I delete volume \"{volume_id}\"")]
fn delete_volume(
    lifecycle_context: LifecycleContext,
    volume_id: String,
) -> Result<LifecycleContext, StepError> {
    let runtime = runtime()?;
    let LifecycleContext {
        gateway,
        controller,
        ..
    } = lifecycle_context;
    let result = runtime.block_on(controller.delete_volume(&volume_id));
    Ok(LifecycleContext {
        gateway,
        controller,
        outcome: Some(LifecycleOutcome::Completed(result)),
    })
}

#[when("I publish volume \"{volume_id}\" to node \"{node_id}\"")]
fn publish_volume(
    lifecycle_context: LifecycleContext,
    volume_id: String,
    node_id: String,
) -> Result<LifecycleContext, StepError> {
    let runtime = runtime()?;
    let capability = VolumeCapability::single_writer_mount();
    let LifecycleContext {
        gateway,
        controller,
        ..
    } = lifecycle_context;
    let result = runtime.block_on(controller.publish_volume(
        &volume_id,
        &node_id,
        Some(&capability),
    ));
    Ok(LifecycleContext {
        gateway,
        controller,
        outcome: Some(LifecycleOutcome::Completed(result)),
    })
}

#[when("I unpublish volume \"{volume_id}\" from node \"{node_id}\"")]
fn unpublish_volume(
    lifecycle_context: LifecycleContext,
    volume_id: String,
    node_id: String,
) -> Result<LifecycleContext, StepError> {
    let runtime = runtime()?;
    let LifecycleContext {
        gateway,
        controller,
        ..
    } = lifecycle_context;
    let result = runtime.block_on(controller.unpublish_volume(&volume_id, &node_id));
    Ok(LifecycleContext {
        gateway,
        controller,
        outcome: Some(LifecycleOutcome::Completed(result)),
    })
}

#[then("the outcome is success")]
fn outcome_is_success(lifecycle_context: &LifecycleContext) -> Result<(), StepError> {
    match &lifecycle_context.outcome {
        Some(LifecycleOutcome::Completed(Ok(()))) => Ok(()),
        Some(LifecycleOutcome::Completed(Err(err))) => Err(StepError::Assertion(format!(
            "expected success, got: {err}"
        ))),
        Some(LifecycleOutcome::Provisioned(_)) => Err(StepError::Assertion(String::from(
            "expected a completion outcome, got a provisioning outcome",
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

#[then("the outcome is a volume \"{volume_id}\" of \"{size_gib}\" GiB")]
fn outcome_is_volume(
    lifecycle_context: &LifecycleContext,
    volume_id: String,
    size_gib: u64,
) -> Result<(), StepError> {
    let Some(LifecycleOutcome::Provisioned(result)) = &lifecycle_context.outcome else {
        return Err(StepError::Assertion(String::from(
            "expected a provisioning outcome",
        )));
    };
    let volume = result
        .as_ref()
        .map_err(|err| StepError::Assertion(format!("expected a volume, got: {err}")))?;
    if volume.id != volume_id {
        return Err(StepError::Assertion(format!(
            "expected volume {volume_id}, got {}",
            volume.id
        )));
    }
    if volume.capacity_bytes != size_gib * GIB {
        return Err(StepError::Assertion(format!(
            "expected {size_gib} GiB, got {} bytes",
            volume.capacity_bytes
        )));
    }
    Ok(())
}

#[then("the outcome fails with code \"{code}\"")]
fn outcome_fails_with_code(
    lifecycle_context: &LifecycleContext,
    code: String,
) -> Result<(), StepError> {
    let actual = match &lifecycle_context.outcome {
        Some(LifecycleOutcome::Provisioned(Err(err))) => err.code(),
        Some(LifecycleOutcome::Completed(Err(err))) => err.code(),
        Some(_) => {
            return Err(StepError::Assertion(String::from(
                "expected a failure outcome",
            )));
        }
        None => return Err(StepError::Assertion(String::from("missing outcome"))),
    };
    if actual.as_str() == code {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected code {code}, got {actual}"
        )))
    }
}

#[then("the gateway recorded \"{count}\" calls to \"{operation}\"")]
fn gateway_recorded_calls(
    lifecycle_context: &LifecycleContext,
    count: u32,
    operation: String,
) -> Result<(), StepError> {
    let actual = match operation.as_str() {
        "create" => lifecycle_context.gateway.create_calls(),
        "attach" => lifecycle_context.gateway.attach_calls(),
        "detach" => lifecycle_context.gateway.detach_calls(),
        "terminate" => lifecycle_context.gateway.terminate_calls(),
        _ => {
            return Err(StepError::Assertion(format!(
                "unknown gateway operation: {operation}"
            )));
        }
    };
    if actual == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} {operation} calls, got {actual}"
        )))
    }
}

#[then("the disk \"{disk_id}\" is attached to \"{instance_id}\"")]
fn disk_is_attached(
    lifecycle_context: &LifecycleContext,
    disk_id: String,
    instance_id: String,
) -> Result<(), StepError> {
    let disk = lifecycle_context
        .gateway
        .disk(&disk_id)
        .ok_or_else(|| StepError::Assertion(format!("no disk {disk_id} in the gateway")))?;
    if disk.attached_to(&instance_id) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "disk {disk_id} is {:?} on {:?}",
            disk.state, disk.instance_id
        )))
    }
}
