//! Single-consumer dispatch of transport events.
//!
//! The [`Dispatcher`] is the only writer of session state. For each
//! [`TransportEvent`] it derives an action, runs the reducer, and publishes
//! the result before the next event is looked at.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::identifiers::RoomId;
use crate::transport::TransportEvent;

use super::action::Action;
use super::interpreter::Interpreter;
use super::reducer::reduce;
use super::snapshot::SnapshotPublisher;
use super::state::ConnectionStatus;

// ============================================================================
// Types
// ============================================================================

/// Callback for a lifecycle transition. Fires at most once.
///
/// Runs on the dispatch task while state is locked; it must not call back
/// into the owning session.
pub type LifecycleHandler = Box<dyn FnOnce() + Send>;

// ============================================================================
// Dispatcher
// ============================================================================

/// Owns the write side of session state.
pub struct Dispatcher {
    room: RoomId,
    publisher: SnapshotPublisher,
    interpreter: Interpreter,
    on_ready: Option<LifecycleHandler>,
    on_closed: Option<LifecycleHandler>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("room", &self.room)
            .field("status", &self.publisher.current().status)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher around an existing publisher.
    #[must_use]
    pub fn new(
        room: RoomId,
        publisher: SnapshotPublisher,
        interpreter: Interpreter,
        on_ready: Option<LifecycleHandler>,
        on_closed: Option<LifecycleHandler>,
    ) -> Self {
        Self {
            room,
            publisher,
            interpreter,
            on_ready,
            on_closed,
        }
    }

    /// Handles one transport event.
    ///
    /// Returns `Break` once the connection has closed; no further events
    /// should be delivered after that.
    pub fn handle(&mut self, event: TransportEvent) -> ControlFlow<()> {
        match event {
            TransportEvent::Ready => {
                self.apply(Action::SetStatus(ConnectionStatus::Connected));
                if let Some(handler) = self.on_ready.take() {
                    handler();
                }
                ControlFlow::Continue(())
            }

            TransportEvent::Frame(frame) => {
                if let Some(action) = self.interpreter.interpret(&frame) {
                    self.apply(action);
                }
                ControlFlow::Continue(())
            }

            TransportEvent::Closed => {
                self.finish();
                ControlFlow::Break(())
            }
        }
    }

    /// Applies one action and publishes the result.
    pub fn apply(&mut self, action: Action) {
        let kind = action.kind();
        let current = self.publisher.current();
        let next = reduce(&current, action);

        if self.publisher.publish(next) {
            trace!(room = %self.room, action = kind, "State updated");
        } else {
            trace!(room = %self.room, action = kind, "No state change");
        }
    }

    /// Final transition: marks the session disconnected and fires
    /// `on_closed`. Safe to call more than once.
    pub fn finish(&mut self) {
        if self.publisher.current().status != ConnectionStatus::Disconnected {
            self.apply(Action::SetStatus(ConnectionStatus::Disconnected));
            debug!(room = %self.room, "Session disconnected");
        }

        if let Some(handler) = self.on_closed.take() {
            handler();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
