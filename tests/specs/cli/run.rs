// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `sfsync run` command.
//!
//! Only the failure paths are covered here: a successful run blocks until
//! Ctrl-C. The live lifecycle is exercised by `crates/cli/tests/transport.rs`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

/// Command isolated from the caller's environment and config file.
fn sfsync(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("sfsync");
    cmd.current_dir(temp.path())
        .env_remove("SFSYNC_ENDPOINT")
        .env_remove("SFSYNC_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn run_without_endpoint_fails() {
    let temp = TempDir::new().unwrap();
    sfsync(&temp)
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: no endpoint configured"))
        .stderr(predicate::str::contains("hint:"));
}

#[parameterized(
    http = { "http://shop.example/ws", "unsupported endpoint scheme 'http'" },
    https = { "https://shop.example/ws", "unsupported endpoint scheme 'https'" },
    garbage = { "not a url", "invalid endpoint URL" },
)]
fn run_rejects_bad_endpoint(endpoint: &str, message: &str) {
    let temp = TempDir::new().unwrap();
    sfsync(&temp)
        .args(["run", "--endpoint", endpoint])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(message));
}

#[test]
fn run_reads_endpoint_from_env() {
    let temp = TempDir::new().unwrap();
    sfsync(&temp)
        .arg("run")
        .env("SFSYNC_ENDPOINT", "ftp://shop.example/ws")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'ftp'"));
}

#[test]
fn run_reads_endpoint_from_config_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("sfsync.toml"),
        "endpoint = \"http://from-file/ws\"\n",
    )
    .unwrap();

    sfsync(&temp)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'http'"));
}

#[test]
fn run_flag_overrides_config_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("sfsync.toml"),
        "endpoint = \"http://from-file/ws\"\n",
    )
    .unwrap();

    sfsync(&temp)
        .args(["run", "--endpoint", "https://from-flag/ws"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'https'"));
}

#[test]
fn run_with_invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("sfsync.toml"), "endpoint = [").unwrap();

    sfsync(&temp)
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config error: failed to parse"));
}

#[test]
fn run_with_missing_explicit_config_fails() {
    let temp = TempDir::new().unwrap();
    sfsync(&temp)
        .args(["run", "--config", "absent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
