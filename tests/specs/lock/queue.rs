//! Lock queue specs

use crate::prelude::*;

#[test]
fn two_users_share_an_app_in_turn() {
    let project = Project::started();

    project
        .alock_as("alice")
        .args(&["lock", "detox"])
        .passes()
        .stdout_eq("OK: Locked\n");
    project
        .alock_as("bob")
        .args(&["lock", "detox"])
        .passes()
        .stdout_eq("WAIT: Locked by 1 other users\n");
    project
        .alock_as("carol")
        .args(&["check", "detox"])
        .passes()
        .stdout_has("OK: Locked")
        .stdout_has("held by alice");
    project
        .alock_as("alice")
        .args(&["unlock", "detox"])
        .passes()
        .stdout_eq("OK: Unlocked\n");
    project
        .alock_as("carol")
        .args(&["check", "detox"])
        .passes()
        .stdout_has("held by bob");
}

#[test]
fn check_on_free_app() {
    Project::started()
        .alock_as("carol")
        .args(&["check", "dealer"])
        .passes()
        .stdout_eq("OK: Not locked\n");
}

#[test]
fn relock_reports_already_locked() {
    let project = Project::started();
    project.alock_as("alice").args(&["lock", "detox"]).passes();
    project
        .alock_as("alice")
        .args(&["lock", "detox"])
        .passes()
        .stdout_eq("OK: Application already locked\n");
}

#[test]
fn unlock_without_record() {
    Project::started()
        .alock_as("alice")
        .args(&["unlock", "detox"])
        .passes()
        .stdout_eq("OK: Application already unlocked\n");
}

#[test]
fn service_holder_is_named() {
    let project = Project::started();
    project
        .alock_as("alice")
        .args(&["--service", "dynamo", "lock", "detox"])
        .passes();
    project
        .alock_as("bob")
        .args(&["check", "detox"])
        .passes()
        .stdout_has("held by alice via dynamo");
}

#[test]
fn impersonated_lock_belongs_to_target() {
    let project = Project::started();
    project
        .alock_as("ops")
        .args(&["--as-user", "alice", "lock", "detox"])
        .passes();
    project
        .alock_as("bob")
        .args(&["check", "detox"])
        .passes()
        .stdout_has("held by alice");
}

#[test]
fn json_output_is_the_response() {
    let project = Project::started();
    project
        .alock_as("alice")
        .args(&["lock", "detox", "--note", "deploy"])
        .passes();
    let run = project
        .alock_as("bob")
        .args(&["--output", "json", "check", "detox"])
        .passes()
        .stdout_has("\"code\": 200")
        .stdout_has("\"result\": \"OK\"")
        .stdout_has("\"message\": \"Locked\"")
        .stdout_has("\"user\": \"alice\"")
        .stdout_has("\"note\": \"deploy\"");
    assert!(!run.stdout().contains("\"service\""));
}
