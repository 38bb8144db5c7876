//! BDD scenarios for the volume lifecycle.

use rstest_bdd_macros::scenario;

use super::test_helpers::{LifecycleContext, lifecycle_context};

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Provision a volume once the disk settles"
)]
fn scenario_provision(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Retry a provisioning request with the same name"
)]
fn scenario_provision_retry(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Delete a provisioned volume"
)]
fn scenario_delete(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Deleting an absent volume is idempotent"
)]
fn scenario_delete_absent(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Publish a volume to a node"
)]
fn scenario_publish(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Republishing to the holding node is a no-op"
)]
fn scenario_publish_same_node(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Refuse to publish a volume attached elsewhere"
)]
fn scenario_publish_conflict(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Unpublishing a detached volume is a no-op"
)]
fn scenario_unpublish_detached(lifecycle_context: LifecycleContext) {
    drop(lifecycle_context);
}
