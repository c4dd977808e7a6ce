//! BadRequest specs

use crate::prelude::*;

#[test]
fn unknown_app_is_rejected() {
    Project::started()
        .alock_as("alice")
        .args(&["lock", "nosuchapp"])
        .fails()
        .stdout_eq("BadRequest: Unknown app\n");
}

#[test]
fn unauthorized_user_cannot_lock() {
    Project::started()
        .alock_as("carol")
        .args(&["lock", "detox"])
        .fails()
        .stdout_eq("BadRequest: User not authorized\n");
}

#[test]
fn unauthorized_user_may_check() {
    Project::started()
        .alock_as("carol")
        .args(&["check", "detox"])
        .passes()
        .stdout_eq("OK: Not locked\n");
}

#[test]
fn unknown_user_is_rejected() {
    Project::started()
        .alock_as("mallory")
        .args(&["check", "detox"])
        .fails()
        .stdout_eq("BadRequest: Unknown user\n");
}

#[test]
fn impersonation_requires_permission() {
    Project::started()
        .alock_as("bob")
        .args(&["--as-user", "alice", "lock", "detox"])
        .fails()
        .stdout_eq("BadRequest: Unknown user\n");
}

#[test]
fn bad_request_json_has_code_400() {
    Project::started()
        .alock_as("alice")
        .args(&["--output", "json", "unlock", "nosuchapp"])
        .fails()
        .stdout_has("\"code\": 400")
        .stdout_has("\"result\": \"BadRequest\"")
        .stdout_lacks("\"data\"");
}
