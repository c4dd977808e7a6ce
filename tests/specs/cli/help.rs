//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_lock_commands() {
    Project::empty()
        .alock()
        .args(&["--help"])
        .passes()
        .stdout_has("check")
        .stdout_has("lock")
        .stdout_has("unlock")
        .stdout_has("daemon");
}

#[test]
fn lock_help_mentions_note() {
    Project::empty()
        .alock()
        .args(&["lock", "--help"])
        .passes()
        .stdout_has("--note");
}

#[test]
fn version_is_printed() {
    Project::empty()
        .alock()
        .args(&["--version"])
        .passes()
        .stdout_has("alock");
}
