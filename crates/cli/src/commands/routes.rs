// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Routes command implementation.
//!
//! Prints the static event route table, either as aligned text or JSON.

use sf_core::{Notice, RouteEntry, ROUTES};

use crate::error::Result;

/// Run the routes command.
pub fn run(json: bool) -> Result<()> {
    let output = if json {
        serde_json::to_string_pretty(ROUTES)?
    } else {
        render_table(ROUTES)
    };
    println!("{}", output);
    Ok(())
}

/// Renders routes as one aligned line per event.
///
/// ```text
/// order.created      orders, order:{id}  (notice: order_created)
/// ```
pub(crate) fn render_table(routes: &[RouteEntry]) -> String {
    let width = routes.iter().map(|r| r.event.len()).max().unwrap_or(0);
    routes
        .iter()
        .map(|route| {
            let line = format!("{:<width$}  {}", route.event, describe_keys(route));
            match route.notice {
                Some(notice) => format!("{}  (notice: {})", line, notice_name(notice)),
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_keys(route: &RouteEntry) -> String {
    let mut keys: Vec<String> = route.collections.iter().map(|c| c.to_string()).collect();
    if let Some(detail) = route.detail {
        let field = match detail.foreign_key {
            Some(fk) => format!("{}|id", fk),
            None => "id".to_string(),
        };
        keys.push(format!("{}:{{{}}}", detail.key, field));
    }
    keys.join(", ")
}

fn notice_name(notice: Notice) -> &'static str {
    match notice {
        Notice::OrderCreated => "order_created",
        Notice::OrderUpdated => "order_updated",
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
