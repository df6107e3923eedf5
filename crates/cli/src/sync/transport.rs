// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the event feed connection.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Mock transports for unit testing
//!
//! Inbound frames are handed up as raw text. Decoding happens in the
//! lifecycle task so a malformed frame costs one message, not the socket.

use std::future::Future;
use std::pin::Pin;

use sf_core::ClientFrame;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Serialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by transport methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Transport trait for WebSocket-like communication.
pub trait Transport: Send + 'static {
    /// Connect to the feed. Replaces any previous connection.
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()>;

    /// Close the connection, if any.
    fn disconnect(&mut self) -> TransportFuture<'_, ()>;

    /// Send a frame to the server.
    fn send(&mut self, frame: ClientFrame) -> TransportFuture<'_, ()>;

    /// Receive the next text frame.
    ///
    /// Returns `None` if the connection was closed.
    fn recv(&mut self) -> TransportFuture<'_, Option<String>>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
pub struct WebSocketTransport {
    /// The WebSocket connection, if connected.
    ws: Option<WebSocketConnection>,
}

/// Internal WebSocket connection wrapper.
struct WebSocketConnection {
    sink: futures_util::stream::SplitSink<WsStream, tokio_tungstenite::tungstenite::Message>,
    stream: futures_util::stream::SplitStream<WsStream>,
}

impl WebSocketTransport {
    /// Create a new WebSocket transport.
    pub fn new() -> Self {
        WebSocketTransport { ws: None }
    }
}

/// Select ring as the process-wide rustls provider for `wss://`.
///
/// rustls refuses to build a TLS config without one. An already installed
/// provider wins.
fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            use futures_util::StreamExt;

            self.ws = None;
            install_crypto_provider();
            let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let (sink, stream) = ws_stream.split();
            self.ws = Some(WebSocketConnection { sink, stream });
            Ok(())
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                use futures_util::SinkExt;
                // Peer may already be gone; nothing to report.
                let _ = ws.sink.close().await;
            }
            Ok(())
        })
    }

    fn send(&mut self, frame: ClientFrame) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            use futures_util::SinkExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            let json = frame
                .to_json()
                .map_err(|e| TransportError::SerializationError(e.to_string()))?;

            if let Err(e) = ws.sink.send(Message::Text(json.into())).await {
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            // Flush so a dead peer surfaces here rather than on the next frame
            if let Err(e) = ws.sink.flush().await {
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<String>> {
        Box::pin(async move {
            use futures_util::StreamExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match ws.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Ok(Some(text.to_string()));
                    }
                    Some(Ok(Message::Close(_))) => {
                        self.ws = None;
                        return Ok(None);
                    }
                    Some(Ok(_)) => {
                        // Protocol-level ping/pong and binary frames carry no events
                        continue;
                    }
                    Some(Err(e)) => {
                        self.ws = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                    None => {
                        self.ws = None;
                        return Ok(None);
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
