//! Freshness tracking for a single telemetry field.
use core::cell::Cell;

use embassy_time::{Duration, Instant};

/// Last known value of a field plus the instant it was recorded.
///
/// Reading returns the value while `now - last_update <= expiry`, and the
/// sentinel afterwards. A tracker that was never updated yields the sentinel.
/// Expiry is evaluated when reading; nothing runs in the background.
///
/// State lives in `Cell`s so updates take `&self`. The type is `!Sync`.
#[derive(Debug)]
pub struct ExpiringValue<T: Copy> {
    value: Cell<T>,
    sentinel: T,
    last_update: Cell<Option<Instant>>,
    expiry: Duration,
}

impl<T: Copy> ExpiringValue<T> {
    pub const fn new(sentinel: T, expiry: Duration) -> Self {
        Self {
            value: Cell::new(sentinel),
            sentinel,
            last_update: Cell::new(None),
            expiry,
        }
    }

    /// Record `value` as observed at `now`.
    pub fn update(&self, value: T, now: Instant) {
        self.value.set(value);
        self.last_update.set(Some(now));
    }

    /// Live value, or the sentinel when expired.
    pub fn get(&self, now: Instant) -> T {
        if self.is_expired(now) {
            self.sentinel
        } else {
            self.value.get()
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        match self.last_update.get() {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.expiry,
        }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub fn last_update(&self) -> Option<Instant> {
        self.last_update.get()
    }
}
