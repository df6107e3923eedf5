// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `sfsync routes` command.

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

#[parameterized(
    product = { "product.updated", "products, product:{id}" },
    inventory = { "inventory.updated", "inventory, products, product:{productId|id}" },
    discount = { "DISCOUNT_UPDATED", "discounts, products" },
    user = { "user.updated", "users, profile" },
    order = { "order.updated", "orders, order:{id}  (notice: order_updated)" },
)]
fn routes_lists_event_and_keys(event: &str, keys: &str) {
    let output = sfsync().arg("routes").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout
        .lines()
        .find(|l| l.starts_with(&format!("{} ", event)))
        .unwrap_or_else(|| panic!("no line for {event} in:\n{stdout}"));
    assert!(line.ends_with(keys), "{line}");
}

#[test]
fn routes_does_not_list_media_detail() {
    sfsync()
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("media:{").not());
}

#[test]
fn routes_json_is_valid() {
    let output = sfsync().args(["routes", "--json"]).output().unwrap();
    assert!(output.status.success());

    let routes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let routes = routes.as_array().unwrap();
    assert!(!routes.is_empty());

    let review = routes
        .iter()
        .find(|r| r["event"] == "review.created")
        .unwrap();
    assert_eq!(review["collections"], serde_json::json!(["reviews"]));
    assert_eq!(review["detail"]["key"], "product");
    assert_eq!(review["detail"]["foreign_key"], "productId");

    let order = routes
        .iter()
        .find(|r| r["event"] == "order.created")
        .unwrap();
    assert_eq!(order["notice"], "order_created");
}

#[test]
fn routes_needs_no_config() {
    let temp = tempfile::TempDir::new().unwrap();
    sfsync()
        .arg("routes")
        .current_dir(temp.path())
        .env_remove("SFSYNC_ENDPOINT")
        .assert()
        .success();
}
