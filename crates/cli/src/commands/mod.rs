// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod probe;
pub mod routes;
pub mod run;

use std::path::Path;

use crate::cli::EndpointArgs;
use crate::config::Config;
use crate::error::{Error, Result};

/// Loads config and applies endpoint flags on top.
pub fn load_config(config_path: Option<&Path>, endpoint: EndpointArgs) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let config = Config::discover(config_path, &cwd)?;
    Ok(config.with_overrides(endpoint.endpoint, endpoint.token))
}

/// Creates the multi-threaded runtime the async commands run on.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))
}
