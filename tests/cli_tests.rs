//! CLI surface tests for the binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_bind_flags() {
    Command::cargo_bin("assetsrates")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("-H, --host"))
        .stdout(predicate::str::contains("-P, --port"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn rejects_invalid_port() {
    Command::cargo_bin("assetsrates")
        .unwrap()
        .args(["-P", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn rejects_unknown_flag() {
    Command::cargo_bin("assetsrates")
        .unwrap()
        .arg("--definitely-not-a-flag")
        .assert()
        .failure();
}

#[test]
fn missing_config_file_fails_fast() {
    Command::cargo_bin("assetsrates")
        .unwrap()
        .args(["--config", "/definitely/not/here.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
