// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use sfsync::Cli;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    if let Err(e) = sfsync::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries command output.
fn setup_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
