// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event dispatch: envelope in, cache invalidations and notices out.
//!
//! The router decides *what* to do ([`plan`]) and hands the decisions to
//! two collaborators owned by the host application:
//! - [`CacheInvalidator`] marks cache keys stale
//! - [`Notifier`] renders user-facing banners

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::protocol::EventEnvelope;
use crate::routes::{route_for, Notice, QueryKey};

/// Order status for which no notice is shown.
///
/// Orders pass through this state on their way to payment; nothing has
/// happened yet from the shopper's point of view.
pub const TRANSIENT_ORDER_STATUS: &str = "awaiting_payment";

/// Number of id characters quoted in notices.
const ORDER_REF_LEN: usize = 6;

/// External cache. Invalidation must be idempotent.
pub trait CacheInvalidator: Send + Sync {
    /// Marks every entry under `key` as stale.
    fn invalidate(&self, key: &QueryKey);
}

/// External banner/toast renderer.
pub trait Notifier: Send + Sync {
    /// Shows a notice to the user.
    fn notify(&self, notification: &Notification);
}

/// A user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: Notice,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

/// Everything one envelope should cause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub invalidations: Vec<QueryKey>,
    pub notification: Option<Notification>,
}

impl Dispatch {
    /// True when the envelope has no effect.
    pub fn is_empty(&self) -> bool {
        self.invalidations.is_empty() && self.notification.is_none()
    }
}

/// Computes the effects of an envelope without performing them.
///
/// Unknown event types and `pong` produce an empty dispatch.
pub fn plan(envelope: &EventEnvelope) -> Dispatch {
    let Some(route) = route_for(&envelope.kind) else {
        return Dispatch::default();
    };
    Dispatch {
        invalidations: route.keys_for(envelope),
        notification: route
            .notice
            .and_then(|notice| notification_for(notice, envelope)),
    }
}

/// Decides whether an order event deserves a notice, and its text.
pub fn notification_for(notice: Notice, envelope: &EventEnvelope) -> Option<Notification> {
    let status = envelope.payload_str("status");
    if status == Some(TRANSIENT_ORDER_STATUS) {
        return None;
    }

    let order_id = envelope.payload_id("id");
    let reference = order_id.as_deref().map(order_ref);

    let (title, message) = match (notice, reference) {
        (Notice::OrderCreated, Some(r)) => ("New order", format!("Order #{} has been placed", r)),
        (Notice::OrderCreated, None) => ("New order", "A new order has been placed".to_string()),
        (Notice::OrderUpdated, reference) => {
            let subject = reference
                .map(|r| format!("Order #{}", r))
                .unwrap_or_else(|| "Your order".to_string());
            let message = match status {
                Some(s) if !s.is_empty() => format!("{} is now {}", subject, s.replace('_', " ")),
                _ => format!("{} was updated", subject),
            };
            ("Order updated", message)
        }
    };

    Some(Notification {
        kind: notice,
        title: title.to_string(),
        message,
        order_id,
    })
}

/// Leading characters of an order id, as shown to the user.
fn order_ref(id: &str) -> String {
    id.chars().take(ORDER_REF_LEN).collect()
}

/// Applies dispatch plans to the host's cache and notifier.
#[derive(Clone)]
pub struct EventRouter {
    cache: Arc<dyn CacheInvalidator>,
    notifier: Arc<dyn Notifier>,
}

impl EventRouter {
    /// Creates a router over the given collaborators.
    pub fn new(cache: Arc<dyn CacheInvalidator>, notifier: Arc<dyn Notifier>) -> Self {
        EventRouter { cache, notifier }
    }

    /// Dispatches an envelope. Returns the number of effects performed.
    pub fn dispatch(&self, envelope: &EventEnvelope) -> usize {
        self.dispatch_while(envelope, || true)
    }

    /// Dispatches an envelope, checking `live` before every effect.
    ///
    /// Once `live` returns false no further effect is performed; this is how
    /// a torn-down connection stops mid-message.
    pub fn dispatch_while(&self, envelope: &EventEnvelope, live: impl Fn() -> bool) -> usize {
        let dispatch = plan(envelope);
        if dispatch.is_empty() {
            debug!(event = %envelope.kind, "no route, ignoring");
            return 0;
        }

        let mut performed = 0;
        for key in &dispatch.invalidations {
            if !live() {
                return performed;
            }
            debug!(event = %envelope.kind, key = %key, "invalidate");
            self.cache.invalidate(key);
            performed += 1;
        }
        if let Some(notification) = &dispatch.notification {
            if !live() {
                return performed;
            }
            self.notifier.notify(notification);
            performed += 1;
        }
        performed
    }

    /// Decodes a text frame and dispatches it.
    ///
    /// Decoding failures are returned without side effects.
    pub fn dispatch_text(&self, text: &str, live: impl Fn() -> bool) -> Result<usize> {
        let envelope = EventEnvelope::from_json(text)?;
        Ok(self.dispatch_while(&envelope, live))
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
