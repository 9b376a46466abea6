//! Type-safe identifiers for room entities.
//!
//! All identifiers travel as plain JSON strings on the wire. The newtypes
//! keep a room id from being passed where a player id is expected.
//!
//! | Type | Assigned by |
//! |------|-------------|
//! | [`RoomId`] | Room-creation service, before the session opens |
//! | [`PlayerId`] | The participant (client-chosen, stable per session) |
//! | [`MessageId`] | The server, when it accepts a chat message |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Macro
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier string.
            #[inline]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// ============================================================================
// Identifiers
// ============================================================================

string_id! {
    /// Identifier of a room, as handed out by the room-creation service.
    RoomId
}

string_id! {
    /// Stable identifier of a participant within a session.
    PlayerId
}

string_id! {
    /// Server-assigned identifier of a chat message.
    MessageId
}

impl PlayerId {
    /// Generates a fresh `player_<hex>` identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("player_{}", Uuid::new_v4().simple()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_raw_value() {
        let id = RoomId::new("AB12CD");
        assert_eq!(id.to_string(), "AB12CD");
        assert_eq!(id.as_str(), "AB12CD");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = PlayerId::from("p1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p1\"");

        let parsed: PlayerId = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_generated_player_ids_are_unique() {
        let a = PlayerId::generate();
        let b = PlayerId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("player_"));
    }

    #[test]
    fn test_message_id_from_string() {
        let id = MessageId::from(String::from("m1"));
        assert_eq!(id.as_ref(), "m1");
    }
}
