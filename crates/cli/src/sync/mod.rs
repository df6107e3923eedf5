// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Realtime cache sync against the storefront event feed.
//!
//! Keeps one WebSocket open to the feed and turns each server event into
//! cache invalidations and, for orders, user-facing notices.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ RealtimeSync │────►│  Transport  │────►│    Feed     │
//! │  (lifecycle) │◄────│   (trait)   │◄────│   Server    │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!     │      │
//!     │      └──► Probe (HTTP reachability, before every dial)
//!     ▼
//! ┌─────────────┐     ┌─────────────────────────────┐
//! │ EventRouter │────►│ CacheInvalidator / Notifier │
//! │  (sf-core)  │     │     (host collaborators)    │
//! └─────────────┘     └─────────────────────────────┘
//! ```
//!
//! # Features
//!
//! - HTTP probe gates every connection attempt (retry every 10s)
//! - Fixed 5s reconnect delay after any close or error
//! - Application-level ping every 30s while open
//! - Immediate, race-free teardown on stop or re-activation
//! - Injectable transport and probe traits for testing

mod connection;
mod heartbeat;
mod probe;
mod sinks;
mod transport;

pub use connection::{
    redact, ConnectionState, EndpointError, RealtimeSync, SharedConnectionState, SyncConfig,
    SyncParams,
};
pub use heartbeat::Heartbeat;
pub use probe::{probe_url, HttpProbe, Probe, ProbeError, ProbeResult, BYPASS_HEADER};
pub use sinks::{ChannelSink, LogSink, SyncEffect};
pub use transport::{Transport, TransportError, TransportFuture, TransportResult, WebSocketTransport};

#[cfg(test)]
mod test_helpers;
