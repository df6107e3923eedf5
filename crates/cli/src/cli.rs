// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const QUICKSTART_HELP: &str = "\
Get started:
  sfsync routes                                  Show which caches each event refreshes
  sfsync probe --endpoint wss://shop.example/ws  Check the feed is reachable
  sfsync run --endpoint wss://shop.example/ws    Stream cache effects as JSON lines";

#[derive(Parser)]
#[command(name = "sfsync")]
#[command(version)]
#[command(about = "Realtime cache sync client for the storefront event feed")]
#[command(
    long_about = "Realtime cache sync client for the storefront event feed.\n\n\
    Keeps a WebSocket open to the feed and turns each server event into cache \
    invalidations and order notices."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Config file (default: ./sfsync.toml if present)
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Connect to the feed and print cache effects until interrupted
    #[command(after_help = "Each effect is printed as one JSON line on stdout:\n  \
        {\"effect\":\"invalidate\",\"key\":[\"products\"]}\n  \
        {\"effect\":\"notify\",\"notification\":{...}}\n\n\
        Logs go to stderr. Press Ctrl-C to stop.")]
    Run(EndpointArgs),

    /// Check once whether the feed endpoint is reachable
    #[command(after_help = "Exits 0 if reachable, 1 otherwise.")]
    Probe(EndpointArgs),

    /// Print the event route table
    Routes {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Endpoint selection shared by commands that talk to the feed.
#[derive(Args, Debug, Clone, Default)]
pub struct EndpointArgs {
    /// Feed endpoint (ws:// or wss://)
    #[arg(long, short, env = "SFSYNC_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Auth token appended to the connect URL
    #[arg(long, env = "SFSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
