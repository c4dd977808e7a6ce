//! CLI error specs

use crate::prelude::*;

#[test]
fn lock_without_daemon_fails() {
    Project::configured()
        .alock_as("alice")
        .args(&["lock", "detox"])
        .fails()
        .stderr_has("Daemon not running");
}

#[test]
fn check_without_identity_fails() {
    Project::configured()
        .alock()
        .args(&["check", "detox"])
        .fails()
        .stderr_has("no subject given");
}

#[test]
fn unknown_subcommand_fails() {
    Project::empty().alock().args(&["grab", "detox"]).fails();
}
