// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use sf_core::{CacheInvalidator, ClientFrame, EventEnvelope, Notification, Notifier, QueryKey};
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::probe::{Probe, ProbeError, ProbeResult};
use super::transport::{Transport, TransportError, TransportFuture};

#[derive(Default)]
struct ServerState {
    connects: Vec<String>,
    sent: Vec<ClientFrame>,
    /// Live connection id and its frame feed.
    feed: Option<(u64, mpsc::UnboundedSender<String>)>,
    next_id: u64,
    fail_connect: bool,
    disconnects: usize,
}

/// Server side of [`MockTransport`]: feeds frames in, records what came out.
#[derive(Clone, Default)]
pub struct MockServer {
    state: Arc<Mutex<ServerState>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose connections land on this server.
    pub fn transport(&self) -> MockTransport {
        MockTransport {
            server: self.clone(),
            conn: None,
        }
    }

    /// Deliver a raw text frame on the live connection.
    ///
    /// Returns false if no connection is live.
    pub fn push(&self, text: &str) -> bool {
        let state = self.state.lock().unwrap();
        match &state.feed {
            Some((_, tx)) => tx.send(text.to_string()).is_ok(),
            None => false,
        }
    }

    /// Deliver an event envelope on the live connection.
    pub fn push_event(&self, kind: &str, payload: Value) -> bool {
        let envelope = EventEnvelope::with_payload(kind, payload);
        self.push(&envelope.to_json().unwrap())
    }

    /// Close the live connection from the server side.
    pub fn drop_connection(&self) {
        self.state.lock().unwrap().feed = None;
    }

    /// Make subsequent connects fail.
    pub fn set_fail_connect(&self, fail: bool) {
        self.state.lock().unwrap().fail_connect = fail;
    }

    /// URLs of every accepted connection, in order.
    pub fn connects(&self) -> Vec<String> {
        self.state.lock().unwrap().connects.clone()
    }

    /// Frames the client sent, across all connections.
    pub fn sent(&self) -> Vec<ClientFrame> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().unwrap().disconnects
    }

    pub fn is_live(&self) -> bool {
        self.state.lock().unwrap().feed.is_some()
    }
}

/// In-memory transport backed by a [`MockServer`].
pub struct MockTransport {
    server: MockServer,
    conn: Option<(u64, mpsc::UnboundedReceiver<String>)>,
}

impl Transport for MockTransport {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            let mut state = self.server.state.lock().unwrap();
            if state.fail_connect {
                return Err(TransportError::ConnectionFailed("mock refused".into()));
            }
            let (tx, rx) = mpsc::unbounded_channel();
            state.next_id += 1;
            let id = state.next_id;
            state.connects.push(url);
            state.feed = Some((id, tx));
            self.conn = Some((id, rx));
            Ok(())
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if let Some((id, _)) = self.conn.take() {
                let mut state = self.server.state.lock().unwrap();
                if state.feed.as_ref().is_some_and(|(live, _)| *live == id) {
                    state.feed = None;
                }
                state.disconnects += 1;
            }
            Ok(())
        })
    }

    fn send(&mut self, frame: ClientFrame) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if self.conn.is_none() {
                return Err(TransportError::ConnectionClosed);
            }
            self.server.state.lock().unwrap().sent.push(frame);
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<String>> {
        Box::pin(async move {
            let (_, rx) = self.conn.as_mut().ok_or(TransportError::ConnectionClosed)?;
            match rx.recv().await {
                Some(text) => Ok(Some(text)),
                None => {
                    self.conn = None;
                    Ok(None)
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }
}

#[derive(Default)]
struct ProbeState {
    script: VecDeque<bool>,
    calls: Vec<(String, Instant)>,
}

/// Probe with scripted answers.
pub struct MockProbe {
    state: Mutex<ProbeState>,
    /// Answer once the script runs out.
    fallback: bool,
}

impl MockProbe {
    /// A probe that always gives the same answer.
    pub fn always(reachable: bool) -> Arc<Self> {
        Self::scripted(&[], reachable)
    }

    /// A probe that answers from `script`, then `fallback` forever.
    pub fn scripted(script: &[bool], fallback: bool) -> Arc<Self> {
        Arc::new(MockProbe {
            state: Mutex::new(ProbeState {
                script: script.iter().copied().collect(),
                calls: Vec::new(),
            }),
            fallback,
        })
    }

    pub fn count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn urls(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.calls.iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn times(&self) -> Vec<Instant> {
        let state = self.state.lock().unwrap();
        state.calls.iter().map(|(_, at)| *at).collect()
    }
}

impl Probe for MockProbe {
    fn probe(&self, url: &str) -> Pin<Box<dyn Future<Output = ProbeResult<()>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.calls.push((url, Instant::now()));
            let reachable = state.script.pop_front().unwrap_or(self.fallback);
            if reachable {
                Ok(())
            } else {
                Err(ProbeError::Status(503))
            }
        })
    }
}

/// Cache and notifier that remember what they were asked to do.
#[derive(Default)]
pub struct Recorder {
    keys: Mutex<Vec<QueryKey>>,
    notices: Mutex<Vec<Notification>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Invalidated keys, rendered as `a:b`.
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().iter().map(ToString::to_string).collect()
    }

    pub fn notices(&self) -> Vec<Notification> {
        self.notices.lock().unwrap().clone()
    }

    pub fn effects(&self) -> usize {
        self.keys.lock().unwrap().len() + self.notices.lock().unwrap().len()
    }
}

impl CacheInvalidator for Recorder {
    fn invalidate(&self, key: &QueryKey) {
        self.keys.lock().unwrap().push(key.clone());
    }
}

impl Notifier for Recorder {
    fn notify(&self, notification: &Notification) {
        self.notices.lock().unwrap().push(notification.clone());
    }
}

/// Let spawned tasks run until they block.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
