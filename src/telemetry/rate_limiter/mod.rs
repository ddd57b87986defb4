//! Drops values that arrive faster than a minimum spacing.
use embassy_time::{Duration, Instant};

/// Emits a value only if more than `min_delay` elapsed since the last
/// emission. Suppressed values are dropped: no buffering, no delayed
/// emission. The first value always goes through.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_delay: Duration,
    last_emit: Option<Instant>,
}

impl RateLimiter {
    pub const fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_emit: None,
        }
    }

    pub fn on_input<T>(&mut self, value: T, now: Instant) -> Option<T> {
        if let Some(last) = self.last_emit {
            if now.saturating_duration_since(last) <= self.min_delay {
                return None;
            }
        }
        self.last_emit = Some(now);
        Some(value)
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }
}
