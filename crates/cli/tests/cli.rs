// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface checks that need no running daemon

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn alock(state: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("alock").unwrap();
    cmd.env("ALOCK_STATE_DIR", state.path().join("state"))
        .env("ALOCK_SOCKET_DIR", state.path().join("sock"))
        .env_remove("ALOCK_SUBJECT")
        .env_remove("ALOCK_ISSUER");
    cmd
}

#[test]
fn help_lists_commands() {
    let state = TempDir::new().unwrap();
    alock(&state)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("lock"))
        .stdout(predicate::str::contains("unlock"))
        .stdout(predicate::str::contains("daemon"));
}

#[test]
fn missing_subject_is_an_error() {
    let state = TempDir::new().unwrap();
    alock(&state)
        .args(["check", "detox"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no subject given"));
}

#[test]
fn commands_need_a_running_daemon() {
    let state = TempDir::new().unwrap();
    alock(&state)
        .args(["lock", "detox", "--subject", "/CN=alice", "--issuer", "/CN=CA"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Daemon not running"));
}

#[test]
fn identity_can_come_from_env() {
    let state = TempDir::new().unwrap();
    alock(&state)
        .env("ALOCK_SUBJECT", "/CN=alice")
        .env("ALOCK_ISSUER", "/CN=CA")
        .args(["unlock", "detox"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Daemon not running"));
}

#[test]
fn status_without_daemon() {
    let state = TempDir::new().unwrap();
    alock(&state)
        .args(["daemon", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon not running"));
}

#[test]
fn rejects_unknown_output_format() {
    let state = TempDir::new().unwrap();
    alock(&state)
        .args(["--output", "xml", "check", "detox"])
        .assert()
        .failure();
}
