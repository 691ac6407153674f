//! Integration tests for CLI commands

#![allow(deprecated)]

use assert_cmd::{assert::OutputAssertExt, cargo::CommandCargoExt};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn sweep(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sweep").unwrap();
    cmd.env("SWEEP_DATA_DIR", data_dir.path());
    cmd
}

#[test]
fn test_main_command_help() {
    let mut cmd = Command::cargo_bin("sweep").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sweep"))
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_submit_command_help() {
    let mut cmd = Command::cargo_bin("sweep").unwrap();
    cmd.arg("submit").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("10 digits"));
}

#[test]
fn test_whoami_when_logged_out() {
    let tmp = TempDir::new().unwrap();

    sweep(&tmp)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn test_logout_is_idempotent() {
    let tmp = TempDir::new().unwrap();

    // Nothing persisted yet; both logouts must succeed.
    sweep(&tmp)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    sweep(&tmp)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    sweep(&tmp)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn test_submit_rejects_short_phone_without_network() {
    let tmp = TempDir::new().unwrap();

    // Validation fires before any connection attempt, so this fails
    // fast even with no server running.
    sweep(&tmp)
        .args([
            "submit",
            "--name",
            "A",
            "--phone",
            "12345",
            "--email",
            "a@b.com",
            "--room",
            "101",
            "--address",
            "x",
            "--service",
            "deep-clean",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("10 digits"));
}

#[test]
fn test_submit_rejects_bad_email() {
    let tmp = TempDir::new().unwrap();

    sweep(&tmp)
        .args([
            "submit",
            "--name",
            "A",
            "--phone",
            "1234567890",
            "--email",
            "not-an-email",
            "--room",
            "101",
            "--address",
            "x",
            "--service",
            "deep-clean",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("email"));
}

#[test]
fn test_submit_requires_all_fields() {
    let tmp = TempDir::new().unwrap();

    sweep(&tmp)
        .args(["submit", "--name", "A", "--phone", "1234567890"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_assign_with_empty_name_makes_no_network_call() {
    let tmp = TempDir::new().unwrap();

    sweep(&tmp)
        .args(["assign", "1", "", "a@b.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staff name and email"));
}

#[test]
fn test_login_rejects_malformed_email_before_network() {
    let tmp = TempDir::new().unwrap();

    sweep(&tmp)
        .args(["login", "not-an-email", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("email"));
}
