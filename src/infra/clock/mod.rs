//! Monotonic time source injected into the senders and the scheduler.
//!
//! Freshness checks never read a global clock: every consumer owns a
//! [`MonotonicClock`] and passes `clock.now()` down to its trackers, so host
//! tests can drive time by hand with [`ManualClock`].
use core::cell::Cell;

use embassy_time::{Duration, Instant};

/// Platform-agnostic monotonic time source.
pub trait MonotonicClock {
    /// Current instant. Never goes backwards.
    fn now(&self) -> Instant;
}

impl<K: MonotonicClock + ?Sized> MonotonicClock for &K {
    #[inline]
    fn now(&self) -> Instant {
        (**self).now()
    }
}

//==================================================================================EMBASSY
/// Clock backed by the embassy time driver of the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

//==================================================================================MANUAL
/// Clock that only moves when told to. Used by host tests and simulations.
///
/// ```rust, ignore
/// let clock = ManualClock::new();
/// clock.advance(Duration::from_millis(100));
/// assert_eq!(clock.now().as_millis(), 100);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    current_ms: Cell<u64>,
}

impl ManualClock {
    /// Clock starting at `t = 0`.
    pub const fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
        }
    }

    /// Clock starting at the given millisecond tick.
    pub const fn with_initial_ms(ms: u64) -> Self {
        Self {
            current_ms: Cell::new(ms),
        }
    }

    /// Jump to an absolute instant. Earlier instants are ignored.
    pub fn set(&self, instant: Instant) {
        let ms = instant.as_millis();
        if ms > self.current_ms.get() {
            self.current_ms.set(ms);
        }
    }

    pub fn advance(&self, by: Duration) {
        self.current_ms
            .set(self.current_ms.get().saturating_add(by.as_millis()));
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.current_ms.get())
    }
}
