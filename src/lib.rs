//! Room Session - client-side state synchronizer for multiplayer game rooms.
//!
//! This library keeps a local, always-consistent view of one game room
//! (connection status, participants, chat history) in sync with a room
//! server over a single WebSocket.
//!
//! # Architecture
//!
//! The session follows a one-way data flow:
//!
//! - **Transport**: one socket per session, owned by a background task
//! - **Interpreter**: each inbound frame becomes at most one [`Action`]
//! - **Reducer**: pure `(state, action) -> state`, the only way state changes
//! - **Snapshots**: whole-state [`Arc`](std::sync::Arc) snapshots via `watch`
//!
//! Key design principles:
//!
//! - Consumers never observe a partially updated state
//! - Undecodable frames are reported and ignored, never fatal
//! - Outbound messages are fire-and-forget; the server broadcast is the ack
//! - After close, no event can change state
//!
//! # Quick Start
//!
//! ```no_run
//! use room_session::{PlayerIdentity, Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Session::builder()
//!         .endpoint("ws://localhost:8000")
//!         .room("AB12CD")
//!         .identity(PlayerIdentity::new("p1", "Alice"))
//!         .open()?;
//!
//!     let mut updates = session.subscribe();
//!     updates
//!         .wait_for(|state| state.is_connected())
//!         .await
//!         .ok();
//!
//!     session.send_message("hello");
//!     println!("Players: {}", session.snapshot().players.len());
//!
//!     session.close();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Wire events and payloads |
//! | [`session`] | [`Session`], state, reducer, snapshots |
//! | [`transport`] | WebSocket connection and target resolution |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for rooms, players, and messages.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Room protocol event types.
///
/// Inbound envelope decoding and outbound event encoding.
pub mod protocol;

/// Session state synchronization.
///
/// Use [`Session::builder()`] to open a session.
pub mod session;

/// WebSocket transport layer.
///
/// Connection lifecycle and endpoint resolution.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{MessageId, PlayerId, RoomId};

// Protocol types
pub use protocol::{ChatMessage, DecodeError, InboundEvent, OutboundEvent, Player, RoomSnapshot};

// Session types
pub use session::{
    Action, ConnectionStatus, Session, SessionBuilder, SessionState, Snapshot, SnapshotReceiver,
    reduce,
};

// Transport types
pub use transport::{ConnectionTarget, PlayerIdentity};
