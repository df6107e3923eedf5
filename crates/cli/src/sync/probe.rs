// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reachability probe run before every connection attempt.
//!
//! Opening a WebSocket against a dead tunnel or proxy can hang without a
//! clean error. A plain HTTP GET against the same host fails fast, so the
//! lifecycle only dials the socket once a probe has come back healthy.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use url::Url;

/// Header asking tunnel providers to skip their browser interstitial.
pub const BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

/// Error type for probe operations.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Endpoint answered with a status that does not indicate a live feed.
    #[error("endpoint unreachable: HTTP {0}")]
    Status(u16),

    /// Request did not complete (DNS, refused, timeout, TLS).
    #[error("endpoint unreachable: {0}")]
    Request(String),

    /// HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Reachability check.
pub trait Probe: Send + Sync + 'static {
    /// Checks the given HTTP(S) URL. `Ok` means "safe to dial".
    fn probe(&self, url: &str) -> Pin<Box<dyn Future<Output = ProbeResult<()>> + Send + '_>>;
}

/// True for statuses that indicate a live feed behind the URL.
///
/// Besides 2xx, `101 Switching Protocols` and `426 Upgrade Required` mean the
/// server speaks WebSocket and merely refused a plain GET.
pub fn is_reachable_status(code: u16) -> bool {
    (200..300).contains(&code) || code == 101 || code == 426
}

/// Translates a feed URL into the URL to probe.
///
/// `ws` becomes `http` and `wss` becomes `https`. The query string is
/// dropped so the auth token never leaves the socket handshake.
pub fn probe_url(endpoint: &Url) -> Url {
    let mut url = endpoint.clone();
    let scheme = match endpoint.scheme() {
        "wss" => "https",
        "ws" => "http",
        other => other,
    };
    // ws/wss and http/https are all special schemes, so this cannot fail.
    let _ = url.set_scheme(scheme);
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// HTTP probe using reqwest.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Create a probe whose requests give up after `timeout`.
    ///
    /// A zero `timeout` leaves requests unbounded.
    pub fn new(timeout: Duration) -> ProbeResult<Self> {
        let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;
        Ok(HttpProbe { client })
    }
}

impl Probe for HttpProbe {
    fn probe(&self, url: &str) -> Pin<Box<dyn Future<Output = ProbeResult<()>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(url.as_str())
                .header(BYPASS_HEADER, "true")
                .send()
                .await
                .map_err(|e| ProbeError::Request(e.to_string()))?;

            let status = response.status().as_u16();
            if is_reachable_status(status) {
                Ok(())
            } else {
                Err(ProbeError::Status(status))
            }
        })
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
