//! WebSocket protocol message types.
//!
//! Both directions share one envelope:
//!
//! ```json
//! { "event_type": "...", "payload": { ... } }
//! ```
//!
//! # Protocol Overview
//!
//! | `event_type` | Direction | Payload |
//! |--------------|-----------|---------|
//! | `game_state_update` | Server → Client | `{ players, messages }` |
//! | `user_joins` | Server → Client | [`Player`] |
//! | `user_leaves` | Server → Client | [`Player`] |
//! | `new_message` | Server → Client | [`ChatMessage`] |
//! | `new_message` | Client → Server | `{ text, player_id, player_name }` |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `event` | Inbound envelope decoding |
//! | `message` | Outbound envelope encoding |
//! | `payload` | Payload shapes shared by both directions |

// ============================================================================
// Submodules
// ============================================================================

/// Inbound event decoding.
pub mod event;

/// Outbound event encoding.
pub mod message;

/// Payload shapes.
pub mod payload;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::{DecodeError, Envelope, InboundEvent, decode_frame};
pub use message::OutboundEvent;
pub use payload::{ChatMessage, NewMessagePayload, Player, RoomSnapshot};
