// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness guard for an open connection.
//!
//! Proxies and carriers silently drop idle sockets, so an open connection
//! sends a ping every interval. By default that is all it does: a dead peer
//! is noticed through the transport's own close/error signal. With a pong
//! deadline configured, a ping that sees no inbound traffic before the
//! deadline also counts as a dead connection.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Per-connection heartbeat state. Dropped with the session it belongs to.
pub struct Heartbeat {
    /// Ping timer; `None` when heartbeats are disabled.
    ticker: Option<Interval>,
    pong_timeout: Option<Duration>,
    /// When the oldest unanswered ping went out.
    ping_sent_at: Option<Instant>,
}

impl Heartbeat {
    /// Starts the timer. The first ping is due one full `period` from now.
    ///
    /// A zero `period` disables pings entirely.
    pub fn new(period: Duration, pong_timeout: Option<Duration>) -> Self {
        let ticker = (!period.is_zero()).then(|| {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        Heartbeat {
            ticker,
            pong_timeout: pong_timeout.filter(|t| !t.is_zero()),
            ping_sent_at: None,
        }
    }

    /// Completes when the next ping is due.
    pub async fn tick(&mut self) {
        match self.ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => std::future::pending().await,
        }
    }

    /// Records that a ping went out.
    pub fn ping_sent(&mut self) {
        if self.pong_timeout.is_some() && self.ping_sent_at.is_none() {
            self.ping_sent_at = Some(Instant::now());
        }
    }

    /// Records inbound traffic; any frame proves the path is alive.
    pub fn traffic(&mut self) {
        self.ping_sent_at = None;
    }

    /// When the connection should be declared dead, if a ping is outstanding.
    pub fn deadline(&self) -> Option<Instant> {
        Some(self.ping_sent_at? + self.pong_timeout?)
    }
}

/// Sleeps until `deadline`, or forever when there is none.
pub async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
