//! Session state synchronization.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Session`] | Synchronizer: connection, dispatch task, snapshots |
//! | [`SessionBuilder`] | Fluent configuration builder |
//! | [`SessionState`] | Status, players, messages |
//! | [`Action`] | State transition vocabulary |
//! | [`reduce`] | Pure `(state, action) -> state` |
//! | [`Interpreter`] | Frame → action, with failure reporting |
//! | [`SnapshotPublisher`] | Whole-state publication via `watch` |
//!
//! # Data Flow
//!
//! ```text
//! socket ─► Connection ─► TransportEvent ─► Dispatcher ─► Interpreter ─► reduce ─► Snapshot
//!   ▲                                                                            │
//!   └──────────── Connection::send ◄──────── Session::send_message ◄─── consumer ┘
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// State transition vocabulary.
pub mod action;

/// Fluent builder for session configuration.
pub mod builder;

/// Session synchronizer.
pub mod core;

/// Transport event dispatch.
pub mod dispatcher;

/// Frame interpretation.
pub mod interpreter;

/// Pure state reducer.
pub mod reducer;

/// Snapshot publication.
pub mod snapshot;

/// Session state types.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use action::Action;
pub use builder::{DEFAULT_ENDPOINT, SessionBuilder};
pub use core::Session;
pub use dispatcher::{Dispatcher, LifecycleHandler};
pub use interpreter::{DecodeErrorHandler, Interpreter};
pub use reducer::reduce;
pub use snapshot::{Snapshot, SnapshotPublisher, SnapshotReceiver};
pub use state::{ConnectionStatus, SessionState};
