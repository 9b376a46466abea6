//! The session synchronizer.
//!
//! A [`Session`] is one client's membership in one room. It owns:
//!
//! - One [`Connection`] (released exactly once, on close or drop)
//! - One dispatch task, the only writer of [`SessionState`]
//! - The read side of the snapshot channel
//!
//! # Example
//!
//! ```no_run
//! use room_session::{PlayerIdentity, Session};
//!
//! # async fn example() -> room_session::Result<()> {
//! let session = Session::builder()
//!     .endpoint("ws://localhost:8000")
//!     .room("AB12CD")
//!     .identity(PlayerIdentity::new("p1", "Alice"))
//!     .open()?;
//!
//! let mut updates = session.subscribe();
//! while updates.changed().await.is_ok() {
//!     let snapshot = updates.borrow_and_update().clone();
//!     println!("{} players, {} messages", snapshot.players.len(), snapshot.messages.len());
//!     if snapshot.is_connected() {
//!         session.send_message("hello");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::protocol::OutboundEvent;
use crate::transport::{Connection, ConnectionTarget, PlayerIdentity, TransportEvents};

use super::builder::{SessionBuilder, SessionConfig};
use super::dispatcher::Dispatcher;
use super::interpreter::Interpreter;
use super::snapshot::{Snapshot, SnapshotPublisher, SnapshotReceiver};
use super::state::{ConnectionStatus, SessionState};

// ============================================================================
// Types
// ============================================================================

/// Dispatcher slot. `None` once the session has been detached.
type DispatcherSlot = Arc<Mutex<Option<Dispatcher>>>;

// ============================================================================
// Session
// ============================================================================

/// Client-side synchronizer for one room membership.
///
/// Consumers read [`Snapshot`]s and post chat messages; every state change
/// goes through the reducer on the dispatch task. Dropping the session
/// closes it.
pub struct Session {
    /// Who we are in the room.
    identity: PlayerIdentity,
    /// The one live socket.
    connection: Connection,
    /// Write side of state, shared with the dispatch task.
    dispatcher: DispatcherSlot,
    /// Read side of state.
    snapshots: SnapshotReceiver,
    /// Dispatch task handle.
    dispatch_task: JoinHandle<()>,
}

// ============================================================================
// Session - Display
// ============================================================================

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("room", self.connection.target().room_id())
            .field("player_id", &self.identity.player_id)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session - Constructor
// ============================================================================

impl Session {
    /// Creates a builder for configuring a session.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Opens the session from validated configuration.
    ///
    /// State starts as `Connecting` and is visible before this returns.
    pub(crate) fn open(config: SessionConfig) -> Self {
        let SessionConfig {
            target,
            identity,
            connect_timeout,
            on_ready,
            on_closed,
            on_decode_error,
        } = config;

        let room = target.room_id().clone();
        let (publisher, snapshots) = SnapshotPublisher::new(SessionState::new());
        let interpreter = Interpreter::new(room.clone(), on_decode_error);
        let dispatcher = Dispatcher::new(room.clone(), publisher, interpreter, on_ready, on_closed);
        let dispatcher: DispatcherSlot = Arc::new(Mutex::new(Some(dispatcher)));

        let (connection, events) = Connection::open(target, connect_timeout);
        let dispatch_task = tokio::spawn(Self::run_dispatch_loop(events, Arc::clone(&dispatcher)));

        debug!(%room, player_id = %identity.player_id, "Session opened");

        Self {
            identity,
            connection,
            dispatcher,
            snapshots,
            dispatch_task,
        }
    }
}

// ============================================================================
// Session - Accessors
// ============================================================================

impl Session {
    /// Returns the latest snapshot.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Returns a receiver that is notified after every state change.
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.clone()
    }

    /// Returns the current connection status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.snapshots.borrow().status
    }

    /// Returns this client's identity.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    /// Returns the connection target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &ConnectionTarget {
        self.connection.target()
    }
}

// ============================================================================
// Session - Operations
// ============================================================================

impl Session {
    /// Posts a chat message to the room.
    ///
    /// Silently dropped unless connected. There is no acknowledgment; the
    /// message appears in state only when the server broadcasts it back.
    pub fn send_message(&self, text: impl Into<String>) {
        let event = OutboundEvent::new_message(
            text,
            self.identity.player_id.clone(),
            self.identity.player_name.clone(),
        );

        match event.to_frame() {
            Ok(frame) => self.connection.send(frame),
            Err(e) => warn!(error = %e, "Failed to encode outbound message"),
        }
    }

    /// Closes the session.
    ///
    /// Detaches the dispatcher first, so no event that arrives afterwards
    /// can change state, then publishes `Disconnected` and closes the
    /// socket. Idempotent.
    pub fn close(&self) {
        let detached = self.dispatcher.lock().take();

        if let Some(mut dispatcher) = detached {
            dispatcher.finish();
            debug!(room = %self.connection.target().room_id(), "Session closed");
        }

        self.connection.close();
        self.dispatch_task.abort();
    }

    /// Returns `true` once the session will no longer change state.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.dispatcher.lock().is_none()
    }
}

// ============================================================================
// Session - Internal
// ============================================================================

impl Session {
    /// Feeds transport events to the dispatcher, one at a time, in order.
    async fn run_dispatch_loop(mut events: TransportEvents, slot: DispatcherSlot) {
        while let Some(event) = events.recv().await {
            let mut guard = slot.lock();

            let Some(dispatcher) = guard.as_mut() else {
                trace!("Event after detach dropped");
                return;
            };

            if dispatcher.handle(event).is_break() {
                guard.take();
                return;
            }
        }

        // Event channel ended without Closed; treat as closed.
        if let Some(mut dispatcher) = slot.lock().take() {
            dispatcher.finish();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

// ============================================================================
// Tests
// ============================================================================
