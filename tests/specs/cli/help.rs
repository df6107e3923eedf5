// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for help and usage output.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use yare::parameterized;

fn sfsync() -> Command {
    cargo_bin_cmd!("sfsync")
}

#[test]
fn help_lists_commands() {
    sfsync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("routes"));
}

#[test]
fn no_arguments_shows_usage_and_fails() {
    sfsync()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[parameterized(
    run = { "run" },
    probe = { "probe" },
    routes = { "routes" },
)]
fn command_supports_help_flag(cmd: &str) {
    sfsync()
        .args([cmd, "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[parameterized(
    run = { "run" },
    probe = { "probe" },
)]
fn endpoint_commands_document_env_vars(cmd: &str) {
    sfsync()
        .args([cmd, "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SFSYNC_ENDPOINT"))
        .stdout(predicate::str::contains("SFSYNC_TOKEN"));
}

#[test]
fn token_value_is_hidden_in_help() {
    sfsync()
        .args(["run", "--help"])
        .env("SFSYNC_TOKEN", "very-secret-token")
        .assert()
        .success()
        .stdout(predicate::str::contains("very-secret-token").not());
}

#[test]
fn version_flag_prints_version() {
    sfsync()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_command_fails() {
    sfsync()
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
