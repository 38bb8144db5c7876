//! Unit tests for the volume lifecycle controller.

use crate::controller::{ErrorCode, VolumeController};
use crate::test_support::ScriptedGateway;
use crate::volume::{CreateVolumeRequest, VolumeCapability};

const ZONE: &str = "ap-guangzhou-3";
const NODE: &str = "ins-test-1";

fn controller_fixture() -> VolumeController<ScriptedGateway> {
    VolumeController::new(ScriptedGateway::new(), ZONE)
}

fn create_request(name: &str, capacity_bytes: u64) -> CreateVolumeRequest {
    CreateVolumeRequest::builder()
        .name(name)
        .capacity_bytes(capacity_bytes)
        .capability(VolumeCapability::single_writer_mount())
        .build()
}

#[test]
fn capabilities_report_the_fixed_set() {
    let controller = controller_fixture();
    let names: Vec<&str> = controller
        .capabilities()
        .iter()
        .map(|capability| capability.as_str())
        .collect();
    assert_eq!(names, ["CREATE_DELETE_VOLUME", "PUBLISH_UNPUBLISH_VOLUME"]);
}

#[test]
fn unsupported_operations_are_refused_statically() {
    let controller = controller_fixture();
    let refusals = [
        controller.validate_volume_capabilities(),
        controller.list_volumes(),
        controller.get_capacity(),
        controller.expand_volume(),
        controller.create_snapshot(),
        controller.delete_snapshot(),
        controller.list_snapshots(),
    ];
    for refusal in refusals {
        let err = refusal.expect_err("operation outside the supported set should be refused");
        assert_eq!(err.code(), ErrorCode::Unimplemented);
    }
    assert_eq!(controller.gateway().create_calls(), 0);
    assert_eq!(controller.gateway().describe_calls(), 0);
}

mod publish;
