//! The state reducer.
//!
//! [`reduce`] is pure and total: it reads the current state, never mutates
//! it, and returns the next state for every [`Action`]. Replaying the same
//! action sequence from the same start always yields the same result.
//!
//! | Action | Transition |
//! |--------|------------|
//! | `SetStatus` | replace `status` |
//! | `SetFullState` | replace `players` and `messages` |
//! | `AddPlayer` | append unless the id is already present |
//! | `RemovePlayer` | drop the matching id, if any |
//! | `AddMessage` | append, no de-duplication |

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashSet;

use crate::protocol::{Player, RoomSnapshot};

use super::action::Action;
use super::state::SessionState;

// ============================================================================
// Reducer
// ============================================================================

/// Computes the state that follows `action`.
#[must_use]
pub fn reduce(state: &SessionState, action: Action) -> SessionState {
    match action {
        Action::SetStatus(status) => SessionState {
            status,
            ..state.clone()
        },

        Action::SetFullState(RoomSnapshot { players, messages }) => SessionState {
            status: state.status,
            players: unique_players(players),
            messages,
        },

        Action::AddPlayer(player) => {
            if state.has_player(&player.player_id) {
                return state.clone();
            }
            let mut next = state.clone();
            next.players.push(player);
            next
        }

        Action::RemovePlayer(player_id) => {
            if !state.has_player(&player_id) {
                return state.clone();
            }
            let mut next = state.clone();
            next.players.retain(|p| p.player_id != player_id);
            next
        }

        // Duplicate message ids are recorded twice.
        Action::AddMessage(message) => {
            let mut next = state.clone();
            next.messages.push(message);
            next
        }
    }
}

/// Keeps the first entry for each player id, preserving order.
fn unique_players(players: Vec<Player>) -> Vec<Player> {
    let mut seen = FxHashSet::default();
    players
        .into_iter()
        .filter(|p| seen.insert(p.player_id.clone()))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
