//! Cooperative debounce timer for live extraction.
//!
//! Each qualifying edit restarts the quiet-period deadline; only when the
//! deadline passes uninterrupted does [`Debounce::fire`] report true, once.
//! Last keystroke wins: there is never more than one pending deadline and
//! nothing queues. Time is passed in explicitly so the contract is
//! independent of any runtime and tests never sleep.

use std::time::{Duration, Instant};

/// Quiet period between the last keystroke and an extraction pass.
pub const DEFAULT_QUIET_MS: u64 = 250;

/// [`DEFAULT_QUIET_MS`] as a [`Duration`].
pub const DEFAULT_QUIET: Duration = Duration::from_millis(DEFAULT_QUIET_MS);

#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Restart the timer: any previously scheduled deadline is discarded.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Discard a pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub const fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the quiet period has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn does_not_fire_before_quiet_period() {
        let now = Instant::now();
        let mut d = Debounce::new(DEFAULT_QUIET);
        d.schedule(now);
        assert!(!d.fire(now));
        assert!(!d.fire(now + 249 * MS));
        assert!(d.pending());
    }

    #[test]
    fn fires_once_after_quiet_period() {
        let now = Instant::now();
        let mut d = Debounce::new(DEFAULT_QUIET);
        d.schedule(now);
        assert!(d.fire(now + 250 * MS));
        assert!(!d.fire(now + 600 * MS));
        assert!(!d.pending());
    }

    #[test]
    fn reschedule_restarts_the_deadline() {
        let now = Instant::now();
        let mut d = Debounce::new(DEFAULT_QUIET);
        d.schedule(now);
        // A second keystroke at t=200 pushes the deadline to t=450.
        d.schedule(now + 200 * MS);
        assert!(!d.fire(now + 300 * MS));
        assert!(d.fire(now + 450 * MS));
    }

    #[test]
    fn cancel_discards_pending_deadline() {
        let now = Instant::now();
        let mut d = Debounce::new(DEFAULT_QUIET);
        d.schedule(now);
        d.cancel();
        assert!(!d.pending());
        assert!(!d.fire(now + 1000 * MS));
    }

    #[test]
    fn never_fires_when_never_scheduled() {
        let mut d = Debounce::default();
        assert!(!d.fire(Instant::now()));
    }
}
