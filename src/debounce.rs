//! Trailing-edge debouncing.
//!
//! Collapses bursts of calls into one: each [`Debouncer::call`] re-arms the
//! deadline and replaces the pending payload, and [`Debouncer::poll`] fires
//! the latest payload once the deadline has passed. The caller drives time,
//! which keeps the behavior deterministic under the event loop.

use std::time::Duration;

use tokio::time::Instant;

/// A trailing-edge debouncer carrying the latest payload.
#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
            pending: None,
        }
    }

    /// Record a call: replaces any pending payload and pushes the deadline
    /// `wait` past `now`.
    pub fn call(&mut self, payload: T, now: Instant) {
        self.pending = Some(payload);
        self.deadline = Some(now + self.wait);
    }

    /// Fire the pending payload if the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Whether a call is waiting to fire.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
