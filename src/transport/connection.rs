//! WebSocket connection and event loop.
//!
//! [`Connection::open`] spawns a tokio task that owns the socket for the
//! whole session. The task:
//!
//! - Connects to the room endpoint (bounded by the connect timeout)
//! - Forwards inbound text frames as [`TransportEvent::Frame`]
//! - Writes outbound frames queued by [`Connection::send`]
//! - Closes the socket on [`Connection::close`] or when the handle is dropped
//!
//! Lifecycle is reported on a single-consumer channel: at most one
//! [`TransportEvent::Ready`], then frames, then exactly one
//! [`TransportEvent::Closed`] regardless of who ended the connection.

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, trace, warn};

use crate::error::{Error, Result};

use super::target::ConnectionTarget;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for the WebSocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Guards process-wide TLS provider installation.
static CRYPTO_PROVIDER: Once = Once::new();

// ============================================================================
// Types
// ============================================================================

/// Client-side WebSocket stream.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Receiving end of a connection's lifecycle channel.
pub type TransportEvents = mpsc::UnboundedReceiver<TransportEvent>;

// ============================================================================
// TransportEvent
// ============================================================================

/// Lifecycle and data events emitted by a [`Connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed; sends are now transmitted.
    Ready,

    /// Raw inbound text frame.
    Frame(String),

    /// Connection ended (local close, remote close, error, or failed connect).
    Closed,
}

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Transmit a text frame.
    Send(String),
    /// Close the socket and stop.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// Exclusively owned handle to one room socket.
///
/// Not `Clone`: exactly one owner releases the socket. Dropping the handle
/// closes the connection.
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Set by the event loop between handshake and close.
    ready: Arc<AtomicBool>,
    /// Set once by the first `close()`.
    closed: AtomicBool,
    /// Where this connection points.
    target: ConnectionTarget,
}

impl Connection {
    /// Starts connecting to `target` and returns immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(target: ConnectionTarget, connect_timeout: Duration) -> (Self, TransportEvents) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let ready = Arc::new(AtomicBool::new(false));

        debug!(room = %target.room_id(), url = %target, "Opening connection");

        tokio::spawn(Self::run_event_loop(
            target.clone(),
            connect_timeout,
            command_rx,
            event_tx,
            Arc::clone(&ready),
        ));

        let connection = Self {
            command_tx,
            ready,
            closed: AtomicBool::new(false),
            target,
        };

        (connection, event_rx)
    }

    /// Returns `true` between handshake completion and close.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Returns the target this connection was opened against.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// Queues a text frame for transmission.
    ///
    /// Silently dropped unless the connection is ready. Nothing is buffered
    /// for later and no acknowledgment is given.
    pub fn send(&self, frame: String) {
        if self.closed.load(Ordering::Acquire) || !self.is_ready() {
            trace!(room = %self.target.room_id(), "Dropping frame, connection not ready");
            return;
        }

        if self.command_tx.send(ConnectionCommand::Send(frame)).is_err() {
            trace!(room = %self.target.room_id(), "Dropping frame, event loop gone");
        }
    }

    /// Closes the connection. Idempotent; the socket is closed once.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        debug!(room = %self.target.room_id(), "Closing connection");
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Performs the WebSocket handshake.
    async fn connect(target: &ConnectionTarget, connect_timeout: Duration) -> Result<WsStream> {
        if target.url().scheme() == "wss" {
            install_crypto_provider();
        }

        let (ws_stream, response) = timeout(connect_timeout, connect_async(target.url().as_str()))
            .await
            .map_err(|_| Error::connection_timeout(millis_saturating(connect_timeout)))??;

        debug!(status = %response.status(), "WebSocket handshake completed");
        Ok(ws_stream)
    }

    /// Event loop that owns the socket.
    async fn run_event_loop(
        target: ConnectionTarget,
        connect_timeout: Duration,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        event_tx: mpsc::UnboundedSender<TransportEvent>,
        ready: Arc<AtomicBool>,
    ) {
        let room = target.room_id().clone();

        // Only Shutdown (or a dropped handle) can arrive before Ready.
        let connected = tokio::select! {
            result = Self::connect(&target, connect_timeout) => result,
            _ = command_rx.recv() => {
                debug!(%room, "Closed before handshake completed");
                let _ = event_tx.send(TransportEvent::Closed);
                return;
            }
        };

        let ws_stream = match connected {
            Ok(stream) => stream,
            Err(e) => {
                warn!(%room, error = %e, "Connection failed");
                let _ = event_tx.send(TransportEvent::Closed);
                return;
            }
        };

        ready.store(true, Ordering::Release);
        let _ = event_tx.send(TransportEvent::Ready);
        info!(%room, "WebSocket connection established");

        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Incoming frames from the room
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            trace!(%room, len = text.len(), "Frame received");
                            if event_tx.send(TransportEvent::Frame(text.as_str().to_owned())).is_err() {
                                debug!(%room, "Event receiver dropped");
                                let _ = ws_write.close().await;
                                break;
                            }
                        }

                        Some(Ok(Message::Close(frame))) => {
                            debug!(%room, ?frame, "WebSocket closed by remote");
                            // Flushes the queued close reply.
                            let _ = ws_write.close().await;
                            break;
                        }

                        Some(Ok(Message::Binary(data))) => {
                            warn!(%room, len = data.len(), "Ignoring binary frame");
                        }

                        Some(Err(e)) => {
                            error!(%room, error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!(%room, "WebSocket stream ended");
                            break;
                        }

                        // Ping, Pong and raw frames are handled by tungstenite
                        _ => {}
                    }
                }

                // Commands from the owning handle
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send(frame)) => {
                            if let Err(e) = ws_write.send(Message::Text(frame.into())).await {
                                warn!(%room, error = %e, "Failed to send frame");
                                break;
                            }
                            trace!(%room, "Frame sent");
                        }

                        Some(ConnectionCommand::Shutdown) | None => {
                            debug!(%room, "Shutdown requested");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }
            }
        }

        ready.store(false, Ordering::Release);
        let _ = event_tx.send(TransportEvent::Closed);
        info!(%room, "WebSocket connection closed");
    }
}

/// Whole milliseconds in `duration`, clamped to `u64::MAX`.
fn millis_saturating(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Installs the ring crypto provider for `wss` unless one is already set.
fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        if rustls::crypto::ring::default_provider().install_default().is_err() {
            trace!("TLS crypto provider already installed");
        }
    });
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;
    use tokio_tungstenite::tungstenite::Error as WsError;
    use tokio_tungstenite::tungstenite::error::UrlError;

    use crate::identifiers::RoomId;
    use crate::transport::PlayerIdentity;

    const WAIT: Duration = Duration::from_secs(5);

    async fn local_listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        (listener, format!("ws://127.0.0.1:{port}"))
    }

    fn target(endpoint: &str) -> ConnectionTarget {
        ConnectionTarget::new(
            endpoint,
            &RoomId::new("R1"),
            &PlayerIdentity::new("p1", "Alice"),
        )
        .expect("target")
    }

    async fn next_event(events: &mut TransportEvents) -> Option<TransportEvent> {
        timeout(WAIT, events.recv()).await.expect("event within timeout")
    }

    #[test]
    fn test_default_connect_timeout() {
        assert_eq!(DEFAULT_CONNECT_TIMEOUT.as_secs(), 30);
    }

    #[tokio::test]
    async fn test_ready_frames_then_closed() {
        let (listener, endpoint) = local_listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");
            ws.send(Message::text("one")).await.expect("send");
            ws.send(Message::text("two")).await.expect("send");
            ws.close(None).await.expect("close");
        });

        let (connection, mut events) = Connection::open(target(&endpoint), WAIT);

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Ready));
        assert_eq!(
            next_event(&mut events).await,
            Some(TransportEvent::Frame("one".into()))
        );
        assert_eq!(
            next_event(&mut events).await,
            Some(TransportEvent::Frame("two".into()))
        );
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));
        assert!(!connection.is_ready());

        server.await.expect("server task");
    }

    #[tokio::test]
    async fn test_refused_connection_reports_closed_only() {
        let (listener, endpoint) = local_listener().await;
        drop(listener);

        let (connection, mut events) = Connection::open(target(&endpoint), WAIT);

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));
        assert_eq!(next_event(&mut events).await, None);
        assert!(!connection.is_ready());
    }

    #[tokio::test]
    async fn test_send_before_ready_is_dropped() {
        let (listener, endpoint) = local_listener().await;

        // Accept TCP but never finish the WebSocket handshake.
        let _server = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(WAIT).await;
        });

        let (connection, mut events) = Connection::open(target(&endpoint), WAIT);
        connection.send("early".into());
        assert!(!connection.is_ready());

        connection.close();
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));
    }

    #[tokio::test]
    async fn test_send_and_local_close() {
        let (listener, endpoint) = local_listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");
            let mut received = Vec::new();
            while let Some(Ok(message)) = ws.next().await {
                match message {
                    Message::Text(text) => received.push(text.as_str().to_owned()),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            received
        });

        let (connection, mut events) = Connection::open(target(&endpoint), WAIT);
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Ready));
        assert!(connection.is_ready());

        connection.send("hello".into());
        connection.close();
        connection.close();

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));
        assert_eq!(next_event(&mut events).await, None);

        let received = timeout(WAIT, server).await.expect("server done").expect("join");
        assert_eq!(received, vec!["hello".to_owned()]);
    }

    #[test]
    fn test_timeout_millis_saturate() {
        assert_eq!(millis_saturating(Duration::from_millis(250)), 250);
        assert_eq!(millis_saturating(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn test_handshake_timeout_reports_millis() {
        let (listener, endpoint) = local_listener().await;

        let _server = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(WAIT).await;
        });

        let err = Connection::connect(&target(&endpoint), Duration::from_millis(100))
            .await
            .err()
            .expect("handshake should time out");
        assert!(matches!(err, Error::ConnectionTimeout { timeout_ms: 100 }));
    }

    #[tokio::test]
    async fn test_wss_uses_tls() {
        let (listener, endpoint) = local_listener().await;
        let endpoint = endpoint.replacen("ws://", "wss://", 1);

        // Plain TCP peer: the TLS handshake must be attempted and then fail.
        let _server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            drop(stream);
        });

        let err = Connection::connect(&target(&endpoint), WAIT)
            .await
            .err()
            .expect("no TLS peer");
        assert!(!matches!(
            err,
            Error::WebSocket(WsError::Url(UrlError::TlsFeatureNotEnabled))
        ));
    }

    #[tokio::test]
    async fn test_binary_frame_is_skipped() {
        let (listener, endpoint) = local_listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");
            ws.send(Message::binary(vec![1u8, 2, 3])).await.expect("send");
            ws.send(Message::text("after")).await.expect("send");
            ws.close(None).await.expect("close");
        });

        let (_connection, mut events) = Connection::open(target(&endpoint), WAIT);

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Ready));
        assert_eq!(
            next_event(&mut events).await,
            Some(TransportEvent::Frame("after".into()))
        );
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));

        server.await.expect("server task");
    }

    #[tokio::test]
    async fn test_remote_close_is_acknowledged() {
        let (listener, endpoint) = local_listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");
            ws.close(None).await.expect("close");

            let mut acknowledged = false;
            while let Some(message) = ws.next().await {
                if let Ok(Message::Close(_)) = message {
                    acknowledged = true;
                }
            }
            acknowledged
        });

        let (_connection, mut events) = Connection::open(target(&endpoint), WAIT);
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Ready));
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));

        let acknowledged = timeout(WAIT, server).await.expect("server done").expect("join");
        assert!(acknowledged);
    }

    #[tokio::test]
    async fn test_drop_closes_socket() {
        let (listener, endpoint) = local_listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");
            loop {
                match ws.next().await {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    _ => {}
                }
            }
        });

        let (connection, mut events) = Connection::open(target(&endpoint), WAIT);
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Ready));

        drop(connection);

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));
        timeout(WAIT, server).await.expect("server saw close").expect("join");
    }
}
