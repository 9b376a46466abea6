//! Builder pattern for session configuration.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use room_session::{PlayerIdentity, Session};
//!
//! # async fn example() -> room_session::Result<()> {
//! let session = Session::builder()
//!     .endpoint("ws://localhost:8000")
//!     .room("AB12CD")
//!     .identity(PlayerIdentity::new("p1", "Alice"))
//!     .connect_timeout(Duration::from_secs(5))
//!     .on_closed(|| eprintln!("room connection lost"))
//!     .open()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::{Error, Result};
use crate::identifiers::RoomId;
use crate::protocol::DecodeError;
use crate::transport::{ConnectionTarget, DEFAULT_CONNECT_TIMEOUT, PlayerIdentity};

use super::core::Session;
use super::dispatcher::LifecycleHandler;
use super::interpreter::DecodeErrorHandler;

// ============================================================================
// Constants
// ============================================================================

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000";

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for opening a [`Session`].
///
/// Use [`Session::builder()`] to create a new builder.
pub struct SessionBuilder {
    /// Base WebSocket endpoint.
    endpoint: String,
    /// Room to join.
    room: Option<RoomId>,
    /// Participant identity.
    identity: Option<PlayerIdentity>,
    /// Handshake timeout.
    connect_timeout: Duration,
    /// Fired once when connected.
    on_ready: Option<LifecycleHandler>,
    /// Fired once when disconnected.
    on_closed: Option<LifecycleHandler>,
    /// Fired for each rejected inbound frame.
    on_decode_error: Option<DecodeErrorHandler>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            room: None,
            identity: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            on_ready: None,
            on_closed: None,
            on_decode_error: None,
        }
    }
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("endpoint", &self.endpoint)
            .field("room", &self.room)
            .field("identity", &self.identity)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SessionBuilder Implementation
// ============================================================================

impl SessionBuilder {
    /// Creates a builder with default endpoint and timeout.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base WebSocket endpoint (e.g. `ws://localhost:8000`).
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the room to join.
    ///
    /// The id comes from the room-creation service and is used as given.
    #[inline]
    #[must_use]
    pub fn room(mut self, room: impl Into<RoomId>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Sets the participant identity.
    #[inline]
    #[must_use]
    pub fn identity(mut self, identity: PlayerIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Uses a generated throwaway identity.
    #[inline]
    #[must_use]
    pub fn anonymous_identity(mut self) -> Self {
        self.identity = Some(PlayerIdentity::anonymous());
        self
    }

    /// Sets the WebSocket handshake timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Registers a callback for the transition to `Connected`.
    #[must_use]
    pub fn on_ready(mut self, handler: impl FnOnce() + Send + 'static) -> Self {
        self.on_ready = Some(Box::new(handler));
        self
    }

    /// Registers a callback for the transition to `Disconnected`.
    ///
    /// Fires once, whether the close was local, remote, or an error.
    #[must_use]
    pub fn on_closed(mut self, handler: impl FnOnce() + Send + 'static) -> Self {
        self.on_closed = Some(Box::new(handler));
        self
    }

    /// Registers an observer for inbound frames that fail to decode.
    #[must_use]
    pub fn on_decode_error(
        mut self,
        handler: impl Fn(&DecodeError, &str) + Send + Sync + 'static,
    ) -> Self {
        self.on_decode_error = Some(Box::new(handler));
        self
    }

    /// Validates configuration and opens the session.
    ///
    /// Returns immediately with status `Connecting`; the handshake runs in
    /// the background. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if room or identity is not set, or no tokio
    ///   runtime is available
    /// - [`Error::Url`] / [`Error::InvalidEndpoint`] if the endpoint is not a
    ///   usable `ws`/`wss` URL
    pub fn open(self) -> Result<Session> {
        let config = self.into_config()?;
        Ok(Session::open(config))
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validated session configuration.
pub(crate) struct SessionConfig {
    pub(crate) target: ConnectionTarget,
    pub(crate) identity: PlayerIdentity,
    pub(crate) connect_timeout: Duration,
    pub(crate) on_ready: Option<LifecycleHandler>,
    pub(crate) on_closed: Option<LifecycleHandler>,
    pub(crate) on_decode_error: Option<DecodeErrorHandler>,
}

impl SessionBuilder {
    /// Checks required settings and resolves the connection target.
    fn into_config(self) -> Result<SessionConfig> {
        let room = self.room.ok_or_else(|| {
            Error::config(
                "Room is required. Use .room() to set it.\n\
                 Example: Session::builder().room(\"AB12CD\")",
            )
        })?;

        let identity = self.identity.ok_or_else(|| {
            Error::config(
                "Identity is required. Use .identity() or .anonymous_identity().\n\
                 Example: Session::builder().identity(PlayerIdentity::new(\"p1\", \"Alice\"))",
            )
        })?;

        let target = ConnectionTarget::new(&self.endpoint, &room, &identity)?;

        if Handle::try_current().is_err() {
            return Err(Error::config(
                "Session::open must be called from within a tokio runtime",
            ));
        }

        Ok(SessionConfig {
            target,
            identity,
            connect_timeout: self.connect_timeout,
            on_ready: self.on_ready,
            on_closed: self.on_closed,
            on_decode_error: self.on_decode_error,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
