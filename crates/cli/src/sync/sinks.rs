// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ready-made cache and notifier collaborators.
//!
//! A host with its own query cache implements [`CacheInvalidator`] and
//! [`Notifier`] directly. These sinks cover the CLI, which has no cache
//! and prints effects instead, and tests.

use serde::Serialize;
use sf_core::{CacheInvalidator, Notification, Notifier, QueryKey};
use tokio::sync::mpsc;
use tracing::info;

/// One effect produced by routing an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SyncEffect {
    Invalidate { key: QueryKey },
    Notify { notification: Notification },
}

/// Logs every effect at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl CacheInvalidator for LogSink {
    fn invalidate(&self, key: &QueryKey) {
        info!(key = %key, "invalidate");
    }
}

impl Notifier for LogSink {
    fn notify(&self, notification: &Notification) {
        info!(
            title = %notification.title,
            message = %notification.message,
            "notify"
        );
    }
}

/// Forwards every effect into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SyncEffect>,
}

impl ChannelSink {
    /// Create a sink and the receiver its effects arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SyncEffect>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelSink { tx }, rx)
    }

    fn emit(&self, effect: SyncEffect) {
        // Receiver gone means the host stopped listening.
        let _ = self.tx.send(effect);
    }
}

impl CacheInvalidator for ChannelSink {
    fn invalidate(&self, key: &QueryKey) {
        self.emit(SyncEffect::Invalidate { key: key.clone() });
    }
}

impl Notifier for ChannelSink {
    fn notify(&self, notification: &Notification) {
        self.emit(SyncEffect::Notify {
            notification: notification.clone(),
        });
    }
}

#[cfg(test)]
#[path = "sinks_tests.rs"]
mod tests;
