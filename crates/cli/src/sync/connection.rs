// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle for the realtime event feed.
//!
//! [`RealtimeSync`] owns at most one background task at a time. The task
//! walks the lifecycle:
//!
//! ```text
//!   Idle ──activate──► Probing ──reachable──► Connecting ──► Open
//!                        ▲  │                     │           │
//!                        │  └─ retry after 10s    │ error     │ close / error
//!                        │                        ▼           ▼
//!                        └────── after 5s ─────── Closed ◄────┘
//! ```
//!
//! Every task carries a [`Lifecycle`]: a cancellation token plus the
//! generation it was started under. Stopping cancels the token and bumps the
//! generation, so a task that is mid-step sees that it is stale and performs
//! no further effects.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sf_core::{ClientFrame, EventRouter};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::heartbeat::{expire, Heartbeat};
use super::probe::{probe_url, HttpProbe, Probe, ProbeResult};
use super::transport::{Transport, WebSocketTransport};

/// Lifecycle state of the feed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// No endpoint configured, or stopped.
    Idle = 0,
    /// Checking that the endpoint answers HTTP before dialing.
    Probing = 1,
    /// Probe succeeded; WebSocket handshake in flight.
    Connecting = 2,
    /// Connected; heartbeat running and events flowing.
    Open = 3,
    /// Connection lost; reconnect scheduled.
    Closed = 4,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Probing,
            2 => ConnectionState::Connecting,
            3 => ConnectionState::Open,
            4 => ConnectionState::Closed,
            _ => ConnectionState::Idle,
        }
    }

    /// Lowercase name for logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Probing => "probing",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        }
    }
}

const STATE_BITS: u32 = 8;
const STATE_MASK: u64 = 0xff;

fn pack(generation: u64, state: ConnectionState) -> u64 {
    (generation << STATE_BITS) | state as u64
}

/// Connection state visible to both the background task and the host.
///
/// Uses atomic fields for lock-free reads. The state word also records the
/// generation that owns it, so a stopped task cannot overwrite the state of
/// whoever stopped it.
pub struct SharedConnectionState {
    state: AtomicU64,
    /// Probe attempt count within the current reachability loop.
    attempt: AtomicU32,
}

impl SharedConnectionState {
    /// Create a new shared state initialized to idle.
    pub fn new() -> Self {
        Self {
            state: AtomicU64::new(pack(0, ConnectionState::Idle)),
            attempt: AtomicU32::new(0),
        }
    }

    /// Get the current state.
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8((self.state.load(Ordering::Acquire) & STATE_MASK) as u8)
    }

    /// Set the state, keeping the current owner.
    pub fn set(&self, state: ConnectionState) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some((current & !STATE_MASK) | state as u64)
            });
    }

    /// Hand ownership to `generation`, resetting to idle.
    fn claim(&self, generation: u64) {
        self.state
            .store(pack(generation, ConnectionState::Idle), Ordering::Release);
        self.attempt.store(0, Ordering::Release);
    }

    /// Set the state only while `generation` still owns it.
    ///
    /// Returns false if ownership has moved on.
    fn set_if_owner(&self, generation: u64, state: ConnectionState) -> bool {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current >> STATE_BITS == generation).then_some(pack(generation, state))
            })
            .is_ok()
    }

    /// Get the current probe attempt count.
    pub fn attempt(&self) -> u32 {
        self.attempt.load(Ordering::Acquire)
    }

    /// Set the probe attempt count.
    pub fn set_attempt(&self, attempt: u32) {
        self.attempt.store(attempt, Ordering::Release);
    }

    /// Check if the connection is open.
    pub fn is_open(&self) -> bool {
        self.get() == ConnectionState::Open
    }

    /// Get a human-readable status string.
    pub fn status_string(&self) -> String {
        match self.get() {
            ConnectionState::Probing => {
                let attempt = self.attempt();
                if attempt > 1 {
                    format!("probing (attempt {})", attempt)
                } else {
                    "probing".to_string()
                }
            }
            state => state.as_str().to_string(),
        }
    }
}

impl Default for SharedConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing for the lifecycle task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Delay before re-probing an unreachable endpoint.
    pub probe_retry: Duration,
    /// Delay between losing a connection and probing again.
    pub reconnect_delay: Duration,
    /// Ping period while open. Zero disables pings.
    pub heartbeat_interval: Duration,
    /// Give up on a probe request after this long.
    pub probe_timeout: Duration,
    /// Declare the connection dead if a ping sees no traffic within this.
    ///
    /// `None` relies on the transport alone to report dead peers.
    pub pong_timeout: Option<Duration>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            probe_retry: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            pong_timeout: None,
        }
    }
}

/// Error type for endpoint validation.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("invalid endpoint URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("unsupported endpoint scheme '{0}'\n  hint: the feed endpoint must be ws:// or wss://")]
    UnsupportedScheme(String),
}

/// What the host activates the client with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncParams {
    /// Feed endpoint (`ws://` or `wss://`). `None` keeps the client idle.
    pub endpoint: Option<String>,
    /// Auth token. Anonymous sessions still connect and get public events.
    pub token: Option<String>,
}

impl SyncParams {
    /// Params for an anonymous session.
    pub fn new(endpoint: impl Into<String>) -> Self {
        SyncParams {
            endpoint: Some(endpoint.into()),
            token: None,
        }
    }

    /// Attach an auth token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The URL to dial, with the token appended as `?token=`.
    ///
    /// Returns `Ok(None)` when no endpoint is configured.
    pub fn connect_url(&self) -> Result<Option<Url>, EndpointError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Ok(None);
        };

        let mut url = Url::parse(endpoint).map_err(|source| EndpointError::InvalidUrl {
            url: endpoint.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(EndpointError::UnsupportedScheme(url.scheme().to_string()));
        }

        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(Some(url))
    }
}

/// URL without its query string, for logging.
pub fn redact(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// Identity of one activation.
#[derive(Clone)]
struct Lifecycle {
    generation: u64,
    current: Arc<AtomicU64>,
    cancel: CancellationToken,
}

impl Lifecycle {
    /// True until this activation is stopped or superseded.
    fn is_current(&self) -> bool {
        !self.cancel.is_cancelled() && self.current.load(Ordering::Acquire) == self.generation
    }

    /// Cancellable sleep. Returns false if the activation ended meanwhile.
    async fn sleep(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => self.is_current(),
        }
    }
}

/// The running activation.
struct Active {
    params: SyncParams,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

type TransportFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Realtime cache sync client.
///
/// Activate it with [`SyncParams`]; it keeps one connection alive and routes
/// server events into the [`EventRouter`]'s collaborators until stopped.
/// Nothing is ever reported back to the caller: failures are logged and
/// retried.
pub struct RealtimeSync<T: Transport = WebSocketTransport, P: Probe = HttpProbe> {
    config: SyncConfig,
    make_transport: TransportFactory<T>,
    probe: Arc<P>,
    router: EventRouter,
    shared_state: Arc<SharedConnectionState>,
    generation: Arc<AtomicU64>,
    active: Option<Active>,
}

impl RealtimeSync<WebSocketTransport, HttpProbe> {
    /// Create a client with the WebSocket transport and HTTP probe.
    pub fn new(config: SyncConfig, router: EventRouter) -> ProbeResult<Self> {
        let probe = HttpProbe::new(config.probe_timeout)?;
        Ok(Self::with_parts(
            config,
            router,
            WebSocketTransport::new,
            Arc::new(probe),
        ))
    }
}

impl<T: Transport, P: Probe> RealtimeSync<T, P> {
    /// Create a client with custom transport and probe (for testing).
    pub fn with_parts(
        config: SyncConfig,
        router: EventRouter,
        make_transport: impl Fn() -> T + Send + Sync + 'static,
        probe: Arc<P>,
    ) -> Self {
        RealtimeSync {
            config,
            make_transport: Arc::new(make_transport),
            probe,
            router,
            shared_state: Arc::new(SharedConnectionState::new()),
            generation: Arc::new(AtomicU64::new(0)),
            active: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.shared_state.get()
    }

    /// Handle for lock-free status reads from elsewhere.
    pub fn shared_state(&self) -> Arc<SharedConnectionState> {
        Arc::clone(&self.shared_state)
    }

    /// Params of the running activation, if any.
    pub fn params(&self) -> Option<&SyncParams> {
        self.active.as_ref().map(|a| &a.params)
    }

    /// Start, restart or stop the connection to match `params`.
    ///
    /// - Same params as the running activation: no-op.
    /// - Different params (new endpoint, login, logout): full teardown, then
    ///   a fresh lifecycle with the new token.
    /// - No endpoint, or an endpoint that does not parse: stays idle.
    ///
    /// Must be called within a tokio runtime.
    pub fn activate(&mut self, params: SyncParams) {
        if self.active.as_ref().is_some_and(|a| a.params == params) {
            return;
        }
        self.stop();

        let connect_url = match params.connect_url() {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug!("no endpoint configured, staying idle");
                return;
            }
            Err(e) => {
                warn!(error = %e, "invalid endpoint, staying idle");
                return;
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.shared_state.claim(generation);
        let cancel = CancellationToken::new();
        let lifecycle = Lifecycle {
            generation,
            current: Arc::clone(&self.generation),
            cancel: cancel.clone(),
        };

        info!(
            endpoint = %redact(&connect_url),
            authenticated = params.token.is_some(),
            generation,
            "starting realtime sync"
        );

        let task = LifecycleTask {
            config: self.config.clone(),
            transport: (self.make_transport)(),
            probe: Arc::clone(&self.probe),
            router: self.router.clone(),
            shared_state: Arc::clone(&self.shared_state),
            lifecycle,
            probe_url: probe_url(&connect_url),
            connect_url,
        };
        let task = tokio::spawn(task.run());

        self.active = Some(Active {
            params,
            cancel,
            task,
        });
    }

    /// Tear down the running activation, if any.
    ///
    /// Takes effect immediately: pending timers are cancelled and no further
    /// invalidation, notification, ping or reconnect happens afterwards. The
    /// socket is closed by the background task as it exits.
    pub fn stop(&mut self) {
        drop(self.take_active());
    }

    /// Like [`stop`](Self::stop), then waits for the socket to close.
    pub async fn shutdown(&mut self) {
        if let Some(task) = self.take_active() {
            let _ = task.await;
        }
    }

    fn take_active(&mut self) -> Option<JoinHandle<()>> {
        let active = self.active.take()?;
        active.cancel.cancel();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.shared_state.claim(generation);
        info!("realtime sync stopped");
        Some(active.task)
    }
}

impl<T: Transport, P: Probe> Drop for RealtimeSync<T, P> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// How an open session ended.
enum SessionEnd {
    /// Torn down by the host.
    Cancelled,
    /// Lost the connection; reconnect.
    Dropped(String),
}

/// Background task driving one activation.
struct LifecycleTask<T: Transport, P: Probe> {
    config: SyncConfig,
    transport: T,
    probe: Arc<P>,
    router: EventRouter,
    shared_state: Arc<SharedConnectionState>,
    lifecycle: Lifecycle,
    connect_url: Url,
    probe_url: Url,
}

impl<T: Transport, P: Probe> LifecycleTask<T, P> {
    async fn run(mut self) {
        loop {
            if !self.probe_until_reachable().await {
                break;
            }

            self.set_state(ConnectionState::Connecting);
            let connected = tokio::select! {
                biased;
                _ = self.lifecycle.cancel.cancelled() => break,
                result = self.transport.connect(self.connect_url.as_str()) => result,
            };

            let reason = match connected {
                Ok(()) => {
                    self.set_state(ConnectionState::Open);
                    info!(endpoint = %redact(&self.connect_url), "connected");
                    match self.session().await {
                        SessionEnd::Cancelled => break,
                        SessionEnd::Dropped(reason) => reason,
                    }
                }
                Err(e) => e.to_string(),
            };

            self.set_state(ConnectionState::Closed);
            warn!(
                reason = %reason,
                retry_in_ms = self.config.reconnect_delay.as_millis() as u64,
                "connection lost"
            );
            let _ = self.transport.disconnect().await;
            if !self.lifecycle.sleep(self.config.reconnect_delay).await {
                break;
            }
        }

        let _ = self.transport.disconnect().await;
        debug!(generation = self.lifecycle.generation, "lifecycle ended");
    }

    /// Probe until the endpoint answers. Returns false if cancelled.
    async fn probe_until_reachable(&mut self) -> bool {
        let mut attempt = 0u32;
        loop {
            attempt = attempt.saturating_add(1);
            if !self.lifecycle.is_current() {
                return false;
            }
            self.shared_state.set_attempt(attempt);
            self.set_state(ConnectionState::Probing);

            let result = tokio::select! {
                biased;
                _ = self.lifecycle.cancel.cancelled() => return false,
                result = self.probe.probe(self.probe_url.as_str()) => result,
            };

            match result {
                Ok(()) => {
                    debug!(attempt, url = %self.probe_url, "endpoint reachable");
                    return true;
                }
                Err(e) => {
                    warn!(
                        attempt,
                        error = %e,
                        retry_in_ms = self.config.probe_retry.as_millis() as u64,
                        "probe failed"
                    );
                }
            }

            if !self.lifecycle.sleep(self.config.probe_retry).await {
                return false;
            }
        }
    }

    /// Pump events and pings until the connection ends.
    async fn session(&mut self) -> SessionEnd {
        let mut heartbeat = Heartbeat::new(self.config.heartbeat_interval, self.config.pong_timeout);

        loop {
            let deadline = heartbeat.deadline();
            tokio::select! {
                biased;
                _ = self.lifecycle.cancel.cancelled() => return SessionEnd::Cancelled,

                frame = self.transport.recv() => match frame {
                    Ok(Some(text)) => {
                        heartbeat.traffic();
                        self.handle_frame(&text);
                    }
                    Ok(None) => return SessionEnd::Dropped("closed by server".to_string()),
                    Err(e) => return SessionEnd::Dropped(e.to_string()),
                },

                _ = heartbeat.tick() => {
                    if !self.lifecycle.is_current() {
                        return SessionEnd::Cancelled;
                    }
                    if self.transport.is_connected() {
                        if let Err(e) = self.transport.send(ClientFrame::ping()).await {
                            return SessionEnd::Dropped(e.to_string());
                        }
                        heartbeat.ping_sent();
                        debug!("ping");
                    }
                }

                _ = expire(deadline) => {
                    return SessionEnd::Dropped("no response to ping".to_string());
                }
            }
        }
    }

    fn handle_frame(&self, text: &str) {
        let lifecycle = &self.lifecycle;
        match self.router.dispatch_text(text, || lifecycle.is_current()) {
            Ok(effects) => debug!(effects, "frame handled"),
            Err(e) => warn!(error = %e, "dropping frame"),
        }
    }

    fn set_state(&self, state: ConnectionState) {
        if self.lifecycle.is_current()
            && self
                .shared_state
                .set_if_owner(self.lifecycle.generation, state)
        {
            debug!(state = state.as_str(), "state");
        }
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
