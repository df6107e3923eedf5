// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Probe command implementation.
//!
//! Runs the same reachability check the sync client runs before dialing,
//! once, and reports the result.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::sync::{probe_url, HttpProbe, Probe};

/// Run the probe command.
///
/// Prints `reachable <url>` and succeeds, or prints `unreachable <url>` and
/// returns the probe error.
pub fn run(config: &Config) -> Result<()> {
    let endpoint = config.params().connect_url()?.ok_or(Error::NoEndpoint)?;
    let target = probe_url(&endpoint);
    let timeout = config.sync_config().probe_timeout;

    let rt = super::runtime()?;
    let result = rt.block_on(async {
        let probe = HttpProbe::new(timeout)?;
        probe.probe(target.as_str()).await
    });

    match result {
        Ok(()) => {
            println!("reachable {}", target);
            Ok(())
        }
        Err(e) => {
            println!("unreachable {}", target);
            Err(e.into())
        }
    }
}
