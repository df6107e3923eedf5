// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{EndpointError, ProbeError};

/// Errors surfaced by the `sfsync` command line.
///
/// The running sync client never returns these; it logs and retries. They
/// come from setup (config, endpoint validation, HTTP client) and one-shot
/// commands.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no endpoint configured\n  hint: pass --endpoint, set SFSYNC_ENDPOINT, or add `endpoint` to sfsync.toml")]
    NoEndpoint,

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
