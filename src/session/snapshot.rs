//! Snapshot publication.
//!
//! The latest state is held as an [`Arc<SessionState>`] inside a
//! `tokio::sync::watch` channel. Publishing swaps the whole `Arc`, so a
//! reader holds either the previous reduction or the next one, never a mix.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tokio::sync::watch;

use super::state::SessionState;

// ============================================================================
// Types
// ============================================================================

/// Immutable view of the session at one point in time.
pub type Snapshot = Arc<SessionState>;

/// Subscription to snapshot changes.
pub type SnapshotReceiver = watch::Receiver<Snapshot>;

// ============================================================================
// SnapshotPublisher
// ============================================================================

/// Write side of the snapshot channel. Owned by the dispatcher.
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Snapshot>,
}

impl SnapshotPublisher {
    /// Creates a publisher seeded with `initial`, plus a first receiver.
    #[must_use]
    pub fn new(initial: SessionState) -> (Self, SnapshotReceiver) {
        let (tx, rx) = watch::channel(Arc::new(initial));
        (Self { tx }, rx)
    }

    /// Returns the currently published snapshot.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Snapshot {
        Arc::clone(&self.tx.borrow())
    }

    /// Publishes `next` if it differs from the current snapshot.
    ///
    /// Returns `true` if subscribers were notified.
    pub fn publish(&self, next: SessionState) -> bool {
        self.tx.send_if_modified(|current| {
            if **current == next {
                return false;
            }
            *current = Arc::new(next);
            true
        })
    }

    /// Creates another receiver.
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.tx.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================
