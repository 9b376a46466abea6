//! Connection target construction.
//!
//! A session connects to one room endpoint of the form
//!
//! ```text
//! {endpoint}/ws/games/{room_id}?player_id={id}&player_name={name}
//! ```
//!
//! Path segments and query values are percent-encoded, so display names with
//! spaces or reserved characters are safe.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::identifiers::{PlayerId, RoomId};

// ============================================================================
// Constants
// ============================================================================

/// Path prefix for room sockets.
const ROOM_PATH: [&str; 2] = ["ws", "games"];

// ============================================================================
// PlayerIdentity
// ============================================================================

/// Who this client is in the room: stable id plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    /// Stable participant id.
    pub player_id: PlayerId,
    /// Display name shown to other players.
    pub player_name: String,
}

impl PlayerIdentity {
    /// Creates an identity from caller-supplied values.
    #[inline]
    #[must_use]
    pub fn new(player_id: impl Into<PlayerId>, player_name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
        }
    }

    /// Creates a throwaway identity: `player_<hex>` and `Player NNN`.
    ///
    /// For rooms that do not issue identities.
    #[must_use]
    pub fn anonymous() -> Self {
        let suffix = Uuid::new_v4().as_u128() % 1000;
        Self {
            player_id: PlayerId::generate(),
            player_name: format!("Player {suffix}"),
        }
    }
}

// ============================================================================
// ConnectionTarget
// ============================================================================

/// Fully resolved WebSocket URL for one room membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    url: Url,
    room_id: RoomId,
}

impl ConnectionTarget {
    /// Builds the target URL from a base endpoint, room and identity.
    ///
    /// The endpoint's own path (if any) is kept as a prefix.
    ///
    /// # Errors
    ///
    /// - [`Error::Url`] if `endpoint` does not parse
    /// - [`Error::InvalidEndpoint`] if the scheme is not `ws`/`wss` or the
    ///   URL cannot carry a path
    pub fn new(endpoint: &str, room_id: &RoomId, identity: &PlayerIdentity) -> Result<Self> {
        let mut url = Url::parse(endpoint)?;

        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::invalid_endpoint(
                endpoint,
                "scheme must be ws or wss",
            ));
        }

        url.path_segments_mut()
            .map_err(|()| Error::invalid_endpoint(endpoint, "endpoint cannot carry a path"))?
            .pop_if_empty()
            .extend(ROOM_PATH)
            .push(room_id.as_str());

        url.query_pairs_mut()
            .clear()
            .append_pair("player_id", identity.player_id.as_str())
            .append_pair("player_name", &identity.player_name);

        Ok(Self {
            url,
            room_id: room_id.clone(),
        })
    }

    /// Returns the resolved URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the room this target joins.
    #[inline]
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}

// ============================================================================
// Tests
// ============================================================================
