// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sfsync - realtime cache sync client for the storefront event feed.
//!
//! This crate hosts the async half of the client: the connection lifecycle,
//! the WebSocket transport, the reachability probe and the heartbeat. Event
//! decoding and routing live in `sf-core`.
//!
//! # Main Components
//!
//! - [`RealtimeSync`] - Owns the connection and drives probe / connect /
//!   reconnect until stopped
//! - [`SyncParams`] - Endpoint and token the client is activated with
//! - [`Config`] - `sfsync.toml` settings for the command line
//! - [`sync`] - Transport and probe traits, sinks, shared status
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sf_core::EventRouter;
//! use sfsync::{RealtimeSync, SyncConfig, SyncParams};
//!
//! let router = EventRouter::new(Arc::new(my_cache), Arc::new(my_toasts));
//! let mut client = RealtimeSync::new(SyncConfig::default(), router)?;
//!
//! // On login
//! client.activate(SyncParams::new("wss://shop.example/ws").with_token(token));
//! // On logout (restarts as an anonymous session)
//! client.activate(SyncParams::new("wss://shop.example/ws"));
//! // On shutdown
//! client.stop();
//! ```

mod cli;
mod commands;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, EndpointArgs};
pub use config::Config;
pub use error::{Error, Result};
pub use sync::{ConnectionState, RealtimeSync, SharedConnectionState, SyncConfig, SyncParams};

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Run(endpoint) => {
            let config = commands::load_config(config_path, endpoint)?;
            commands::run::run(&config)
        }
        Command::Probe(endpoint) => {
            let config = commands::load_config(config_path, endpoint)?;
            commands::probe::run(&config)
        }
        Command::Routes { json } => commands::routes::run(json),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
