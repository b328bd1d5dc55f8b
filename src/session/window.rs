//! Deadline-based timed windows.
//!
//! Every timed sub-window (peek, power, respond) records a deadline and a
//! generation token. A deadline callback carries the generation it was
//! scheduled for and is ignored unless that generation is still current, so a
//! superseded window can never advance the session twice.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source for window deadlines.
pub trait Clock: Send + 'static {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
///
/// ```
/// use kabo_engine::session::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(3));
/// assert_eq!(clock.now() - start, Duration::from_secs(3));
/// ```
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Which sub-stage a window belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowKind {
    Peek,
    Look,
    Joker,
    Respond,
}

/// An open timed window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedWindow {
    pub kind: WindowKind,
    pub deadline: Instant,
    pub generation: u64,
}

impl TimedWindow {
    /// Time left before the deadline, zero once it has passed.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Whole seconds left, rounded up, as shown on a countdown.
#[must_use]
pub fn seconds_left(remaining: Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Countdown text in `m:ss` form.
#[must_use]
pub fn timer_text(remaining: Duration) -> String {
    let secs = seconds_left(remaining);
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_saturates() {
        let clock = ManualClock::new();
        let window = TimedWindow {
            kind: WindowKind::Respond,
            deadline: clock.now() + Duration::from_secs(3),
            generation: 1,
        };

        assert_eq!(window.remaining(clock.now()), Duration::from_secs(3));
        assert!(!window.is_expired(clock.now()));

        clock.advance(Duration::from_secs(4));
        assert_eq!(window.remaining(clock.now()), Duration::ZERO);
        assert!(window.is_expired(clock.now()));
    }

    #[test]
    fn test_timer_text_rounds_up() {
        assert_eq!(timer_text(Duration::from_millis(2_100)), "0:03");
        assert_eq!(timer_text(Duration::from_secs(5)), "0:05");
        assert_eq!(timer_text(Duration::from_secs(75)), "1:15");
        assert_eq!(timer_text(Duration::ZERO), "0:00");
    }
}
