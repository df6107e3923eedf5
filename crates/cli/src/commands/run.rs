// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run command implementation.
//!
//! Activates the sync client with a [`ChannelSink`] and writes every effect
//! to stdout as one JSON line until Ctrl-C.

use std::io::Write;
use std::sync::Arc;

use sf_core::EventRouter;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::sync::{ChannelSink, RealtimeSync, SyncConfig, SyncEffect, SyncParams};

/// Run the sync client in the foreground.
///
/// This function blocks until interrupted.
pub fn run(config: &Config) -> Result<()> {
    let params = config.params();
    // Surface a bad endpoint here; the client itself would only log it.
    if params.connect_url()?.is_none() {
        return Err(Error::NoEndpoint);
    }

    let rt = super::runtime()?;
    rt.block_on(run_async(config.sync_config(), params))
}

async fn run_async(sync_config: SyncConfig, params: SyncParams) -> Result<()> {
    let (sink, mut effects) = ChannelSink::new();
    let router = EventRouter::new(Arc::new(sink.clone()), Arc::new(sink));
    let mut client = RealtimeSync::new(sync_config, router)?;
    client.activate(params);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                break;
            }
            Some(effect) = effects.recv() => {
                write_effect(&mut std::io::stdout().lock(), &effect)?;
            }
        }
    }

    info!(state = %client.shared_state().status_string(), "interrupted, shutting down");
    client.shutdown().await;
    Ok(())
}

/// Writes one effect as a JSON line and flushes.
pub(crate) fn write_effect(out: &mut impl Write, effect: &SyncEffect) -> Result<()> {
    let line = serde_json::to_string(effect)?;
    writeln!(out, "{}", line)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
