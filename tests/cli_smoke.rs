//! Behavioural smoke tests for the CLI entrypoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn cli_without_arguments_prints_usage() {
    let mut cmd = cargo_bin_cmd!("ruslan");
    cmd.assert().failure().stderr(contains("Usage"));
}

#[test]
fn caps_lists_the_supported_operations() {
    let mut cmd = cargo_bin_cmd!("ruslan");
    cmd.arg("caps");
    cmd.assert()
        .success()
        .stdout(contains("CREATE_DELETE_VOLUME"))
        .stdout(contains("PUBLISH_UNPUBLISH_VOLUME"));
}

#[test]
fn create_requires_a_size() {
    let mut cmd = cargo_bin_cmd!("ruslan");
    cmd.args(["create", "--name", "data-01"]);
    cmd.assert().failure().stderr(contains("--size-gib"));
}

#[test]
fn delete_requires_a_volume_id() {
    let mut cmd = cargo_bin_cmd!("ruslan");
    cmd.arg("delete");
    cmd.assert().failure().stderr(contains("VOLUME_ID"));
}
