// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from `sfsync.toml` (or `--config <path>`) and
//! includes:
//! - `endpoint`: the feed URL (`ws://` or `wss://`)
//! - `token`: optional auth token appended to the connect URL
//! - `[timing]`: probe, reconnect and heartbeat delays in seconds
//!
//! Command-line flags and environment variables override the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sync::{SyncConfig, SyncParams};

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "sfsync.toml";

/// Client configuration stored in `sfsync.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Feed endpoint. Absent means the client stays idle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Auth token. Absent means an anonymous session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Lifecycle timing, in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Delay before re-probing an unreachable endpoint (default: 10).
    #[serde(default = "default_probe_retry_secs")]
    pub probe_retry_secs: u64,
    /// Delay before reconnecting after a close or error (default: 5).
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// Ping period while connected (default: 30). 0 = disabled.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    /// Timeout for a single probe request (default: 10).
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Max silence after a ping before reconnecting (default: 0). 0 = disabled.
    #[serde(default)]
    pub pong_timeout_secs: u64,
}

fn default_probe_retry_secs() -> u64 {
    10
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

fn default_heartbeat_interval_secs() -> u64 {
    30
}

fn default_probe_timeout_secs() -> u64 {
    10
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            probe_retry_secs: default_probe_retry_secs(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            pong_timeout_secs: 0,
        }
    }
}

impl Config {
    /// Loads configuration from the given file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Loads an explicit config file, or `sfsync.toml` from `dir` if present.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = default_path(dir);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, endpoint: Option<String>, token: Option<String>) -> Self {
        if endpoint.is_some() {
            self.endpoint = endpoint;
        }
        if token.is_some() {
            self.token = token;
        }
        self
    }

    /// Lifecycle timing derived from the `[timing]` table.
    pub fn sync_config(&self) -> SyncConfig {
        let t = &self.timing;
        SyncConfig {
            probe_retry: Duration::from_secs(t.probe_retry_secs),
            reconnect_delay: Duration::from_secs(t.reconnect_delay_secs),
            heartbeat_interval: Duration::from_secs(t.heartbeat_interval_secs),
            probe_timeout: Duration::from_secs(t.probe_timeout_secs),
            pong_timeout: (t.pong_timeout_secs > 0)
                .then(|| Duration::from_secs(t.pong_timeout_secs)),
        }
    }

    /// Activation params for the sync client.
    pub fn params(&self) -> SyncParams {
        SyncParams {
            endpoint: self.endpoint.clone().filter(|e| !e.is_empty()),
            token: self.token.clone().filter(|t| !t.is_empty()),
        }
    }
}

/// Path of the default config file within `dir`.
pub fn default_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
