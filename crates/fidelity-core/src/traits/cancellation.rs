//! Stopping a refinement session between oracle calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A stop request the refiner polls before scoring each iteration.
///
/// The poll sits between blocking oracle round-trips, so a request made
/// while the oracle is scoring or transforming takes effect once that call
/// returns, and the session ends `Cancelled` with the iterations scored so
/// far. Nothing in flight is aborted.
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    /// Ask the session to stop at its next poll. Idempotent.
    fn cancel(&self);
}

/// Shared stop flag. Clone it into whatever thread or oracle decides to
/// stop the session; every clone observes the same request.
///
/// The flag guards no other data: the refiner only needs to see it
/// eventually, so `Relaxed` loads and stores suffice.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
