// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket frames exchanged with the storefront event feed.
//!
//! The protocol is deliberately small:
//! - Server pushes `{"type": "...", "payload": {...}}` envelopes
//! - Client sends `{"type": "ping"}` keepalives and nothing else

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event type of the server's heartbeat reply.
pub const PONG: &str = "pong";

/// A server-pushed event.
///
/// `kind` is drawn from the route table vocabulary but is kept as a plain
/// string so that unknown types still decode and can be dropped by the router.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEnvelope {
    /// Event name, e.g. `product.updated`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Resource-specific body. Absent for `pong` and most broadcasts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl EventEnvelope {
    /// Creates an envelope without a payload.
    pub fn new(kind: impl Into<String>) -> Self {
        EventEnvelope {
            kind: kind.into(),
            payload: None,
        }
    }

    /// Creates an envelope carrying the given payload.
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        EventEnvelope {
            kind: kind.into(),
            payload: Some(payload),
        }
    }

    /// Returns true for the heartbeat reply.
    pub fn is_pong(&self) -> bool {
        self.kind == PONG
    }

    /// Looks up a top-level payload field as an identifier.
    ///
    /// Strings are returned as-is, integers are stringified. Empty strings,
    /// nulls and any other JSON type count as "no id".
    pub fn payload_id(&self, field: &str) -> Option<String> {
        match self.payload.as_ref()?.get(field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
            _ => None,
        }
    }

    /// Looks up a top-level payload field as a string.
    pub fn payload_str(&self, field: &str) -> Option<&str> {
        self.payload.as_ref()?.get(field)?.as_str()
    }

    /// Serializes the envelope to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an envelope from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Frames sent from client to server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Keepalive. The server answers with a `pong` envelope.
    Ping,
}

impl ClientFrame {
    /// Creates a Ping frame.
    pub fn ping() -> Self {
        ClientFrame::Ping
    }

    /// Serializes the frame to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a frame from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
