//! WebSocket transport layer.
//!
//! Owns the one live socket of a session and reports its lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                            ┌─────────────────┐
//! │  Session (Rust)  │                            │  Room server    │
//! │                  │         WebSocket          │                 │
//! │  Connection  ────┼───────────────────────────►│  /ws/games/{id} │
//! │  TransportEvents◄┼────────────────────────────┤                 │
//! └──────────────────┘                            └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `ConnectionTarget::new` - Resolve room URL with identity parameters
//! 2. `Connection::open` - Spawn event loop, start handshake
//! 3. `TransportEvent::Ready` - Handshake done, sends are transmitted
//! 4. `TransportEvent::Frame` - One per inbound text frame
//! 5. `TransportEvent::Closed` - Exactly once, whatever the cause
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |
//! | `target` | Room URL and participant identity |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// Connection target construction.
pub mod target;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, DEFAULT_CONNECT_TIMEOUT, TransportEvent, TransportEvents};
pub use target::{ConnectionTarget, PlayerIdentity};
