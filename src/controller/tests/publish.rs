//! Tests for the attachment flow.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, timeout};

use crate::controller::{ControllerError, ErrorCode, POLL_INTERVAL, WAIT_TIMEOUT};
use crate::volume::VolumeCapability;

use super::{NODE, controller_fixture};

#[tokio::test(start_paused = true)]
async fn publish_attaches_an_unattached_disk() {
    let controller = controller_fixture();
    controller.gateway().seed_unattached("disk-9", 10);

    controller
        .publish_volume("disk-9", NODE, Some(&VolumeCapability::single_writer_mount()))
        .await
        .unwrap_or_else(|err| panic!("publish should succeed: {err}"));

    assert_eq!(controller.gateway().attach_calls(), 1);
    let disk = controller
        .gateway()
        .disk("disk-9")
        .unwrap_or_else(|| panic!("disk should still exist"));
    assert!(disk.attached_to(NODE));
}

#[tokio::test(start_paused = true)]
async fn publish_is_a_no_op_when_already_attached_to_the_node() {
    let controller = controller_fixture();
    controller.gateway().seed_attached("disk-9", 10, NODE);

    controller
        .publish_volume("disk-9", NODE, Some(&VolumeCapability::single_writer_mount()))
        .await
        .unwrap_or_else(|err| panic!("repeat publish should succeed: {err}"));

    assert_eq!(controller.gateway().attach_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn publish_refuses_a_disk_attached_elsewhere() {
    let controller = controller_fixture();
    controller.gateway().seed_attached("disk-9", 10, "ins-other");

    let err = controller
        .publish_volume("disk-9", NODE, Some(&VolumeCapability::single_writer_mount()))
        .await
        .expect_err("contested disk should be refused");
    assert!(
        matches!(err, ControllerError::AttachedElsewhere { .. }),
        "unexpected publish outcome: {err:?}"
    );
    assert_eq!(err.code(), ErrorCode::FailedPrecondition);
    assert_eq!(controller.gateway().attach_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn publish_validates_its_arguments_before_describing() {
    let controller = controller_fixture();
    let capability = VolumeCapability::single_writer_mount();

    let missing_volume = controller
        .publish_volume("", NODE, Some(&capability))
        .await
        .expect_err("empty volume id should be rejected");
    assert!(matches!(missing_volume, ControllerError::MissingVolumeId));

    let missing_node = controller
        .publish_volume("disk-9", "", Some(&capability))
        .await
        .expect_err("empty node id should be rejected");
    assert!(matches!(missing_node, ControllerError::MissingNodeId));

    let missing_capability = controller
        .publish_volume("disk-9", NODE, None)
        .await
        .expect_err("capability-free publish should be rejected");
    assert!(matches!(
        missing_capability,
        ControllerError::MissingCapability
    ));
    assert_eq!(missing_capability.code(), ErrorCode::InvalidArgument);

    assert_eq!(controller.gateway().describe_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn publish_fails_not_found_for_an_unknown_disk() {
    let controller = controller_fixture();

    let err = controller
        .publish_volume("disk-404", NODE, Some(&VolumeCapability::single_writer_mount()))
        .await
        .expect_err("unknown disk should be NotFound");
    assert!(
        matches!(err, ControllerError::NotFound { .. }),
        "unexpected publish outcome: {err:?}"
    );
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test(start_paused = true)]
async fn publish_surfaces_attach_rejections_as_internal() {
    let controller = controller_fixture();
    controller.gateway().seed_unattached("disk-9", 10);
    controller.gateway().fail_attachments("instance is stopped");

    let err = controller
        .publish_volume("disk-9", NODE, Some(&VolumeCapability::single_writer_mount()))
        .await
        .expect_err("rejected attach should surface");
    assert!(
        matches!(err, ControllerError::Gateway { .. }),
        "unexpected publish outcome: {err:?}"
    );
    assert_eq!(err.code(), ErrorCode::Internal);
}

#[tokio::test(start_paused = true)]
async fn publish_times_out_as_internal_when_attachment_never_converges() {
    let controller = controller_fixture();
    controller.gateway().seed_unattached("disk-9", 10);
    controller.gateway().stall_attachments();

    let started = Instant::now();
    let err = controller
        .publish_volume("disk-9", NODE, Some(&VolumeCapability::single_writer_mount()))
        .await
        .expect_err("stalled attach should time out");
    assert!(
        matches!(err, ControllerError::AttachTimedOut { .. }),
        "unexpected publish outcome: {err:?}"
    );
    assert_eq!(err.code(), ErrorCode::Internal);

    let elapsed = started.elapsed();
    assert!(elapsed >= WAIT_TIMEOUT, "gave up early after {elapsed:?}");
    assert!(
        elapsed <= WAIT_TIMEOUT + POLL_INTERVAL,
        "kept polling too long: {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn mutations_on_the_same_volume_wait_for_each_other() {
    let controller = Arc::new(controller_fixture());
    controller.gateway().seed_unattached("disk-9", 10);
    controller.gateway().stall_attachments();

    let pending = tokio::spawn({
        let publisher = Arc::clone(&controller);
        async move {
            let capability = VolumeCapability::single_writer_mount();
            publisher
                .publish_volume("disk-9", NODE, Some(&capability))
                .await
        }
    });
    tokio::task::yield_now().await;

    let blocked = timeout(Duration::from_secs(10), controller.delete_volume("disk-9")).await;
    assert!(
        blocked.is_err(),
        "delete should wait for the in-flight publish"
    );

    let publish_outcome = pending.await.unwrap_or_else(|err| panic!("join publish: {err}"));
    assert!(
        matches!(publish_outcome, Err(ControllerError::AttachTimedOut { .. })),
        "unexpected publish outcome: {publish_outcome:?}"
    );

    controller
        .delete_volume("disk-9")
        .await
        .unwrap_or_else(|err| panic!("delete should proceed once the lock is free: {err}"));
}
