//! Outbound event encoding.
//!
//! Outbound frames use the same envelope as inbound ones; serde's adjacent
//! tagging produces `{ "event_type": ..., "payload": ... }` directly.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::to_string;

use crate::error::Result;
use crate::identifiers::PlayerId;

use super::payload::NewMessagePayload;

// ============================================================================
// OutboundEvent
// ============================================================================

/// An event sent from this client to the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", content = "payload")]
pub enum OutboundEvent {
    /// Post a chat message.
    #[serde(rename = "new_message")]
    NewMessage(NewMessagePayload),
}

impl OutboundEvent {
    /// Builds a `new_message` event for the given author.
    #[inline]
    #[must_use]
    pub fn new_message(
        text: impl Into<String>,
        player_id: PlayerId,
        player_name: impl Into<String>,
    ) -> Self {
        Self::NewMessage(NewMessagePayload {
            text: text.into(),
            player_id,
            player_name: player_name.into(),
        })
    }

    /// Serializes the event to a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_frame(&self) -> Result<String> {
        Ok(to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
