//! Daemon lifecycle specs
//!
//! Verify daemon start/stop/status lifecycle.

use crate::prelude::*;

#[test]
fn daemon_status_when_not_running() {
    Project::configured()
        .alock()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_start_reports_success() {
    Project::configured()
        .alock()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon started");
}

#[test]
fn daemon_start_twice_is_harmless() {
    let project = Project::started();
    project
        .alock()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon already running");
}

#[test]
fn daemon_status_shows_running_details() {
    let project = Project::started();
    project
        .alock()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Status: running")
        .stdout_has("Version:")
        .stdout_has("Uptime:")
        .stdout_has("Records: 0")
        .stdout_has("detox: 0")
        .stdout_has("dealer: 0");
}

#[test]
fn daemon_status_counts_records() {
    let project = Project::started();
    project.alock_as("alice").args(&["lock", "detox"]).passes();
    project.alock_as("bob").args(&["lock", "detox"]).passes();
    project
        .alock()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Records: 2")
        .stdout_has("detox: 2");
}

#[test]
fn daemon_stop_stops_it() {
    let project = Project::started();
    project
        .alock()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon stopped");
    project
        .alock()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_stop_when_not_running() {
    Project::configured()
        .alock()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_start_without_config_reports_error() {
    Project::empty()
        .alock()
        .args(&["daemon", "start"])
        .fails()
        .stderr_has("Failed to start daemon");
}

#[test]
fn daemon_start_with_invalid_config_reports_error() {
    Project::with_config("apps = []\n")
        .alock()
        .args(&["daemon", "start"])
        .fails()
        .stderr_has("Failed to start daemon");
}

#[test]
fn locks_survive_restart() {
    let project = Project::started();
    project
        .alock_as("alice")
        .args(&["lock", "detox", "--note", "release 4.2"])
        .passes();
    project.alock().args(&["daemon", "stop"]).passes();
    project.alock().args(&["daemon", "start"]).passes();

    project
        .alock_as("bob")
        .args(&["check", "detox"])
        .passes()
        .stdout_has("held by alice")
        .stdout_has("(release 4.2)");
}
