//! Frame interpretation.
//!
//! Turns a raw inbound frame into at most one [`Action`]. Rejected frames are
//! logged and handed to the optional [`DecodeErrorHandler`]; they never reach
//! the reducer.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::{trace, warn};

use crate::identifiers::RoomId;
use crate::protocol::{DecodeError, decode_frame};

use super::action::Action;

// ============================================================================
// Types
// ============================================================================

/// Observer for rejected frames.
///
/// Receives the decode error and the raw frame text.
pub type DecodeErrorHandler = Box<dyn Fn(&DecodeError, &str) + Send + Sync>;

// ============================================================================
// Interpreter
// ============================================================================

/// Decodes frames for one room and reports failures.
pub struct Interpreter {
    room: RoomId,
    on_error: Option<DecodeErrorHandler>,
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("room", &self.room)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl Interpreter {
    /// Creates an interpreter; `on_error` is optional.
    #[must_use]
    pub fn new(room: RoomId, on_error: Option<DecodeErrorHandler>) -> Self {
        Self { room, on_error }
    }

    /// Decodes `frame` into an action, or reports and discards it.
    pub fn interpret(&self, frame: &str) -> Option<Action> {
        match decode_frame(frame) {
            Ok(event) => {
                trace!(room = %self.room, event_type = event.event_type(), "Frame decoded");
                Some(Action::from(event))
            }
            Err(e) => {
                warn!(room = %self.room, error = %e, "Discarding undecodable frame");
                if let Some(handler) = &self.on_error {
                    handler(&e, frame);
                }
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
