//! State transition vocabulary.
//!
//! Every change to [`SessionState`](super::SessionState) is expressed as one
//! [`Action`]. Inbound events map onto actions one-to-one; lifecycle changes
//! become [`Action::SetStatus`].

// ============================================================================
// Imports
// ============================================================================

use crate::identifiers::PlayerId;
use crate::protocol::{ChatMessage, InboundEvent, Player, RoomSnapshot};

use super::state::ConnectionStatus;

// ============================================================================
// Action
// ============================================================================

/// A typed unit of state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the connection status.
    SetStatus(ConnectionStatus),

    /// Replace players and messages wholesale (initial sync).
    SetFullState(RoomSnapshot),

    /// A player joined.
    AddPlayer(Player),

    /// A player left.
    RemovePlayer(PlayerId),

    /// A chat message arrived.
    AddMessage(ChatMessage),
}

impl Action {
    /// Short name for logging.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetStatus(_) => "set_status",
            Self::SetFullState(_) => "set_full_state",
            Self::AddPlayer(_) => "add_player",
            Self::RemovePlayer(_) => "remove_player",
            Self::AddMessage(_) => "add_message",
        }
    }
}

impl From<InboundEvent> for Action {
    fn from(event: InboundEvent) -> Self {
        match event {
            InboundEvent::GameStateUpdate(snapshot) => Self::SetFullState(snapshot),
            InboundEvent::UserJoins(player) => Self::AddPlayer(player),
            InboundEvent::UserLeaves(player) => Self::RemovePlayer(player.player_id),
            InboundEvent::NewMessage(message) => Self::AddMessage(message),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
