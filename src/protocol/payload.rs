//! Payload shapes carried inside event envelopes.
//!
//! Field names match the wire exactly (`snake_case`), so these types are
//! used directly as both protocol payloads and session state entries.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::identifiers::{MessageId, PlayerId};

// ============================================================================
// Player
// ============================================================================

/// A participant in the room.
///
/// Created on a join event and removed on a leave event; never edited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Stable, unique identifier within the session.
    pub player_id: PlayerId,

    /// Display name. Not unique.
    pub player_name: String,
}

impl Player {
    /// Creates a player entry.
    #[inline]
    #[must_use]
    pub fn new(player_id: impl Into<PlayerId>, player_name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
        }
    }
}

// ============================================================================
// ChatMessage
// ============================================================================

/// A chat message as broadcast by the server.
///
/// `timestamp` is kept verbatim (ISO-8601 text); the client never parses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server-assigned message identifier.
    pub message_id: MessageId,

    /// Author's player id.
    pub player_id: PlayerId,

    /// Author's display name at send time.
    pub player_name: String,

    /// Message body.
    pub text: String,

    /// Server receive time, ISO-8601.
    pub timestamp: String,
}

// ============================================================================
// RoomSnapshot
// ============================================================================

/// Full room contents, sent once on initial sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// Everyone currently in the room.
    pub players: Vec<Player>,

    /// Message history so far.
    pub messages: Vec<ChatMessage>,
}

// ============================================================================
// NewMessagePayload
// ============================================================================

/// Outbound chat message. The server assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessagePayload {
    /// Message body.
    pub text: String,

    /// Sender's player id.
    pub player_id: PlayerId,

    /// Sender's display name.
    pub player_name: String,
}
