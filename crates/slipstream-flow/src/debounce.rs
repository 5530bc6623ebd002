//! Coalescing bursts of events into a single update.

use std::time::{Duration, Instant};

/// Holds the latest value of a burst and releases it once no new value has
/// arrived for the quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<T>,
    last_event: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_event: None,
        }
    }

    /// Record a value, replacing any pending one and restarting the quiet
    /// period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.last_event = Some(now);
    }

    /// Take the pending value if the burst has gone quiet.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.last_event = None;
        self.pending.take()
    }

    /// When the pending value becomes available.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_event.map(|at| at + self.quiet)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
