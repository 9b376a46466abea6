//! Inbound event decoding.
//!
//! Every frame from the server is a JSON envelope:
//!
//! ```json
//! { "event_type": "user_joins", "payload": { "player_id": "p2", "player_name": "Bob" } }
//! ```
//!
//! Decoding runs in two stages: the envelope first, then the payload for the
//! discriminant it names. That keeps "unknown kind" apart from "known kind,
//! wrong shape" when a frame is rejected. Envelopes, payloads and the records
//! inside them must be JSON objects; positional arrays are rejected.
//!
//! # Event Types
//!
//! | `event_type` | Payload |
//! |--------------|---------|
//! | `game_state_update` | [`RoomSnapshot`] |
//! | `user_joins` | [`Player`] |
//! | `user_leaves` | [`Player`] |
//! | `new_message` | [`ChatMessage`] |

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, from_str, from_value};
use thiserror::Error;

use super::payload::{ChatMessage, Player, RoomSnapshot};

// ============================================================================
// Event Type Names
// ============================================================================

/// Full snapshot replace.
pub const GAME_STATE_UPDATE: &str = "game_state_update";

/// A player joined.
pub const USER_JOINS: &str = "user_joins";

/// A player left.
pub const USER_LEAVES: &str = "user_leaves";

/// A chat message, in either direction.
pub const NEW_MESSAGE: &str = "new_message";

// ============================================================================
// Envelope
// ============================================================================

/// Undecoded envelope: discriminant plus raw payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// Event kind discriminant.
    pub event_type: String,

    /// Kind-specific payload, not yet checked.
    #[serde(default)]
    pub payload: Value,
}

// ============================================================================
// InboundEvent
// ============================================================================

/// A decoded server-pushed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Replace players and messages wholesale.
    GameStateUpdate(RoomSnapshot),

    /// A player joined the room.
    UserJoins(Player),

    /// A player left the room.
    UserLeaves(Player),

    /// A chat message was broadcast.
    NewMessage(ChatMessage),
}

impl InboundEvent {
    /// Returns the wire discriminant for this event.
    #[inline]
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::GameStateUpdate(_) => GAME_STATE_UPDATE,
            Self::UserJoins(_) => USER_JOINS,
            Self::UserLeaves(_) => USER_LEAVES,
            Self::NewMessage(_) => NEW_MESSAGE,
        }
    }
}

// ============================================================================
// DecodeError
// ============================================================================

/// Why an inbound frame was rejected.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Not JSON, or missing `event_type`.
    #[error("Malformed envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// Valid JSON, but not an object.
    #[error("Envelope is not a JSON object")]
    EnvelopeNotObject,

    /// Envelope parsed but names no known kind.
    #[error("Unknown event type: {event_type}")]
    UnknownEventType {
        /// The unrecognized discriminant.
        event_type: String,
    },

    /// Known kind, payload is not an object.
    #[error("Payload for {event_type} is not a JSON object")]
    PayloadNotObject {
        /// The discriminant whose payload failed.
        event_type: &'static str,
    },

    /// Known kind, payload does not have the expected shape.
    #[error("Invalid payload for {event_type}: {source}")]
    Payload {
        /// The discriminant whose payload failed.
        event_type: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Returns the discriminant involved, if the envelope got that far.
    #[must_use]
    pub fn event_type(&self) -> Option<&str> {
        match self {
            Self::Envelope(_) | Self::EnvelopeNotObject => None,
            Self::UnknownEventType { event_type } => Some(event_type.as_str()),
            Self::PayloadNotObject { event_type } | Self::Payload { event_type, .. } => {
                Some(*event_type)
            }
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes one raw text frame into a typed event.
///
/// # Errors
///
/// Returns a [`DecodeError`] describing which stage rejected the frame.
pub fn decode_frame(text: &str) -> Result<InboundEvent, DecodeError> {
    let value: Value = from_str(text).map_err(DecodeError::Envelope)?;

    // serde also accepts a sequence for a struct; only objects are envelopes.
    if !value.is_object() {
        return Err(DecodeError::EnvelopeNotObject);
    }

    let envelope: Envelope = from_value(value).map_err(DecodeError::Envelope)?;
    envelope.decode()
}

impl Envelope {
    /// Decodes the payload according to `event_type`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnknownEventType`], [`DecodeError::PayloadNotObject`]
    /// or [`DecodeError::Payload`].
    pub fn decode(self) -> Result<InboundEvent, DecodeError> {
        match self.event_type.as_str() {
            GAME_STATE_UPDATE => {
                payload(GAME_STATE_UPDATE, self.payload).map(InboundEvent::GameStateUpdate)
            }
            USER_JOINS => payload(USER_JOINS, self.payload).map(InboundEvent::UserJoins),
            USER_LEAVES => payload(USER_LEAVES, self.payload).map(InboundEvent::UserLeaves),
            NEW_MESSAGE => payload(NEW_MESSAGE, self.payload).map(InboundEvent::NewMessage),
            _ => Err(DecodeError::UnknownEventType {
                event_type: self.event_type,
            }),
        }
    }
}

/// Decodes a payload that must be an object all the way down to each record.
fn payload<T: DeserializeOwned>(event_type: &'static str, value: Value) -> Result<T, DecodeError> {
    if !is_record_shaped(&value) {
        return Err(DecodeError::PayloadNotObject { event_type });
    }
    from_value(value).map_err(|source| DecodeError::Payload { event_type, source })
}

/// `true` if `value` is an object whose array fields hold only objects.
fn is_record_shaped(value: &Value) -> bool {
    let Some(fields) = value.as_object() else {
        return false;
    };

    fields
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .all(Value::is_object)
}

// ============================================================================
// Tests
// ============================================================================
