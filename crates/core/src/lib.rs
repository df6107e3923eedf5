// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sf-core: Shared library for the storefront realtime sync client
//!
//! This crate provides the wire protocol, the static event route table, and
//! the router that turns server events into cache invalidations and
//! user-facing notices. It has no async runtime dependency; the connection
//! lifecycle lives in the `sfsync` crate.

pub mod error;
pub mod protocol;
pub mod router;
pub mod routes;

pub use error::{Error, Result};
pub use protocol::{ClientFrame, EventEnvelope};
pub use router::{
    plan, CacheInvalidator, Dispatch, EventRouter, Notification, Notifier, TRANSIENT_ORDER_STATUS,
};
pub use routes::{route_for, DetailKey, Notice, QueryKey, RouteEntry, ROUTES};
