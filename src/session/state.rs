//! Session state types.
//!
//! [`SessionState`] is the single source of truth for one room membership.
//! It is only ever replaced by [`reduce`](super::reducer::reduce); consumers
//! see it through shared, immutable [`Snapshot`](super::Snapshot)s.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

use crate::identifiers::PlayerId;
use crate::protocol::{ChatMessage, Player};

// ============================================================================
// ConnectionStatus
// ============================================================================

/// Transport lifecycle as seen by the session.
///
/// Moves forward only: `Connecting` → `Connected` → `Disconnected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Handshake in progress.
    #[default]
    Connecting,
    /// Socket open; sends are transmitted.
    Connected,
    /// Terminal for this session.
    Disconnected,
}

impl ConnectionStatus {
    /// Returns the lowercase wire/display name.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Room membership and message history for one connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Transport lifecycle only; never inferred from other fields.
    pub status: ConnectionStatus,

    /// Unique by `player_id`, in join order as observed here.
    pub players: Vec<Player>,

    /// Append-only, in arrival order.
    pub messages: Vec<ChatMessage>,
}

impl SessionState {
    /// Fresh state for a connection that is just starting.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the socket is open.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Looks up a player by id.
    #[must_use]
    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.player_id == player_id)
    }

    /// Returns `true` if a player with this id is in the room.
    #[inline]
    #[must_use]
    pub fn has_player(&self, player_id: &PlayerId) -> bool {
        self.player(player_id).is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_connecting_and_empty() {
        let state = SessionState::new();
        assert_eq!(state.status, ConnectionStatus::Connecting);
        assert!(state.players.is_empty());
        assert!(state.messages.is_empty());
        assert!(!state.is_connected());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ConnectionStatus::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionStatus::Connected.to_string(), "connected");
        assert_eq!(ConnectionStatus::Disconnected.to_string(), "disconnected");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ConnectionStatus::Disconnected).unwrap();
        assert_eq!(json, "\"disconnected\"");
    }

    #[test]
    fn test_player_lookup() {
        let state = SessionState {
            players: vec![Player::new("p1", "Alice")],
            ..SessionState::new()
        };

        assert_eq!(
            state.player(&PlayerId::new("p1")).map(|p| p.player_name.as_str()),
            Some("Alice")
        );
        assert!(!state.has_player(&PlayerId::new("p2")));
    }
}
