// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for sf-core operations.

use thiserror::Error;

/// Errors raised while handling inbound frames.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed event frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),
}

/// A specialized Result type for sf-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
