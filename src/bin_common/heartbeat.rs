//! Heartbeat logging for long-running processes

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Tracks heartbeat intervals for periodic status logging
///
/// The runner logs one status line whenever the interval has elapsed since
/// the last beat, independently of how often cycles run.
pub struct Heartbeat {
    interval: Duration,
    last_beat: DateTime<Utc>,
}

impl Heartbeat {
    /// Create a heartbeat with the given interval in seconds, starting now
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            last_beat: Utc::now(),
        }
    }

    /// Check if enough time has passed since the last beat
    pub fn should_beat(&self) -> bool {
        self.should_beat_at(Utc::now())
    }

    /// Same check against an explicit clock reading
    ///
    /// A `now` earlier than the last beat counts as no time elapsed.
    pub fn should_beat_at(&self, now: DateTime<Utc>) -> bool {
        let elapsed = now.signed_duration_since(self.last_beat);
        elapsed.to_std().unwrap_or_default() >= self.interval
    }

    /// Record a heartbeat at the current time
    pub fn beat(&mut self) {
        self.last_beat = Utc::now();
    }
}
