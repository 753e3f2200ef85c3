//! Scroll signal debouncing
//!
//! Rapid successive scroll signals collapse into a single sample taken at
//! window expiry, carrying the last observed depth. Each new signal resets
//! the window. The clock is passed in explicitly so the behavior is
//! deterministic and testable without timers.

use chrono::{DateTime, Duration, Utc};

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_WINDOW_MS: i64 = 300;

#[derive(Debug, Clone, Copy)]
struct PendingSample {
    percent: u8,
    deadline: DateTime<Utc>,
}

/// Collapses a burst of scroll signals into at most one sample per window
#[derive(Debug)]
pub struct ScrollDebouncer {
    window: Duration,
    pending: Option<PendingSample>,
}

impl Default for ScrollDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW_MS)
    }
}

impl ScrollDebouncer {
    /// Create a debouncer with the given window in milliseconds
    pub fn new(window_ms: i64) -> Self {
        Self {
            window: Duration::milliseconds(window_ms),
            pending: None,
        }
    }

    /// Observe a raw scroll signal, resetting the window deadline
    pub fn observe(&mut self, now: DateTime<Utc>, percent: u8) {
        self.pending = Some(PendingSample {
            percent: percent.min(100),
            deadline: now + self.window,
        });
    }

    /// Poll for an expired sample.
    ///
    /// Returns the sample timestamp (the window expiry) and the last
    /// observed depth once the window has elapsed with no further signals.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, u8)> {
        match self.pending {
            Some(sample) if now >= sample.deadline => {
                self.pending = None;
                Some((sample.deadline, sample.percent))
            }
            _ => None,
        }
    }

    /// Whether a signal is waiting for its window to expire
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn test_single_signal_emits_at_expiry() {
        let mut debouncer = ScrollDebouncer::new(300);
        debouncer.observe(at_ms(0), 40);

        assert_eq!(debouncer.poll(at_ms(299)), None);
        let (sampled_at, percent) = debouncer.poll(at_ms(300)).unwrap();
        assert_eq!(sampled_at, at_ms(300));
        assert_eq!(percent, 40);
    }

    #[test]
    fn test_burst_collapses_to_last_value() {
        let mut debouncer = ScrollDebouncer::new(300);
        debouncer.observe(at_ms(0), 10);
        debouncer.observe(at_ms(100), 25);
        debouncer.observe(at_ms(200), 60);

        // Window restarts at each signal; nothing before 200 + 300.
        assert_eq!(debouncer.poll(at_ms(400)), None);
        let (sampled_at, percent) = debouncer.poll(at_ms(500)).unwrap();
        assert_eq!(sampled_at, at_ms(500));
        assert_eq!(percent, 60);
    }

    #[test]
    fn test_one_sample_per_window() {
        let mut debouncer = ScrollDebouncer::new(300);
        debouncer.observe(at_ms(0), 30);

        assert!(debouncer.poll(at_ms(350)).is_some());
        // Sample consumed; no duplicate on the next poll.
        assert_eq!(debouncer.poll(at_ms(400)), None);
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn test_separate_windows_emit_separately() {
        let mut debouncer = ScrollDebouncer::new(300);
        debouncer.observe(at_ms(0), 20);
        let first = debouncer.poll(at_ms(300)).unwrap();

        debouncer.observe(at_ms(1000), 80);
        let second = debouncer.poll(at_ms(1300)).unwrap();

        assert_eq!(first.1, 20);
        assert_eq!(second.1, 80);
    }
}
