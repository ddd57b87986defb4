//! Periodic runner that drives every sender at its own cadence and hands the
//! payloads to the CAN bus.
//!
//! Deadlines advance by whole intervals from the previous deadline so the
//! cadence does not drift with processing time. A sender that falls more
//! than one interval behind is re-anchored on the current instant instead of
//! bursting catch-up messages.
use core::ops::AddAssign;

use embassy_time::{Duration, Instant};

use crate::infra::clock::MonotonicClock;
use crate::protocol::transport::fast_packet::MAX_FAST_PACKET_PAYLOAD;
use crate::protocol::transport::traits::{
    can_bus::CanBus,
    n2k_timer::N2kTimer,
    pgn_sender::{PgnHeader, PgnSender},
};
use crate::telemetry::traits::Periodic;

/// Sleep used by [`TelemetryScheduler::run`] when no sender is registered.
const IDLE_DELAY_MS: u32 = 1000;

/// Outcome of one or more scheduler passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Messages handed to the bus successfully.
    pub sent: usize,
    /// Messages lost to a serialization or bus error. Never retried.
    pub failed: usize,
}

impl AddAssign for TickReport {
    fn add_assign(&mut self, rhs: Self) {
        self.sent += rhs.sent;
        self.failed += rhs.failed;
    }
}

/// Runner in the style of an embassy task: owns the bus handle, a timer and
/// the clock, and borrows the senders.
pub struct TelemetryScheduler<'a, C, T, K, const N: usize>
where
    C: CanBus,
    T: N2kTimer,
    K: MonotonicClock,
{
    senders: [&'a dyn Periodic; N],
    next_due: [Instant; N],
    can: C,
    timer: T,
    clock: K,
    source_address: u8,
    /// 3-bit Fast Packet sequence counter shared by every message of this node.
    sequence_id: u8,
    started: bool,
}

impl<'a, C, T, K, const N: usize> TelemetryScheduler<'a, C, T, K, N>
where
    C: CanBus,
    T: N2kTimer,
    K: MonotonicClock,
{
    pub fn new(
        senders: [&'a dyn Periodic; N],
        can: C,
        timer: T,
        clock: K,
        source_address: u8,
    ) -> Self {
        Self {
            senders,
            next_due: [Instant::from_ticks(0); N],
            can,
            timer,
            clock,
            source_address,
            sequence_id: 0,
            started: false,
        }
    }

    /// Start every sender and make all of them due immediately.
    pub fn start(&mut self) {
        let now = self.clock.now();
        for (sender, due) in self.senders.iter().zip(self.next_due.iter_mut()) {
            sender.start();
            *due = now;
        }
        self.started = true;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Telemetry scheduler started with {} senders, source address {}",
            N,
            self.source_address
        );
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn source_address(&self) -> u8 {
        self.source_address
    }

    /// Change the source address, e.g. after an address claim.
    pub fn set_source_address(&mut self, source_address: u8) {
        self.source_address = source_address;
    }

    /// Earliest pending deadline, `None` before [`start`](Self::start) or
    /// without senders.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.started {
            return None;
        }
        self.next_due.iter().copied().min()
    }

    /// Fire every sender whose deadline is reached, once each.
    pub async fn fire_due(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if !self.started {
            return report;
        }

        let now = self.clock.now();
        for index in 0..N {
            if self.next_due[index] > now {
                continue;
            }
            let sender = self.senders[index];

            if self.emit(sender).await {
                report.sent += 1;
            } else {
                report.failed += 1;
            }

            self.next_due[index] = next_deadline(self.next_due[index], sender.tick_interval(), now);
        }
        report
    }

    /// Run until the next deadline would be after `end`.
    pub async fn run_until(&mut self, end: Instant) -> TickReport {
        if !self.started {
            self.start();
        }
        let mut report = TickReport::default();
        while let Some(deadline) = self.next_deadline() {
            if deadline > end {
                break;
            }
            self.sleep_until(deadline).await;
            report += self.fire_due().await;
        }
        report
    }

    /// Scheduler main loop. Never returns.
    pub async fn run(&mut self) {
        if !self.started {
            self.start();
        }
        loop {
            match self.next_deadline() {
                Some(deadline) => {
                    self.sleep_until(deadline).await;
                    self.fire_due().await;
                }
                None => self.timer.delay_ms(IDLE_DELAY_MS).await,
            }
        }
    }

    /// Bus handle, e.g. to inspect a test double.
    pub fn can(&self) -> &C {
        &self.can
    }

    pub fn into_parts(self) -> (C, T, K) {
        (self.can, self.timer, self.clock)
    }

    async fn sleep_until(&mut self, deadline: Instant) {
        let wait = deadline.saturating_duration_since(self.clock.now());
        if wait > Duration::from_ticks(0) {
            let millis = wait.as_millis().min(u32::MAX as u64) as u32;
            self.timer.delay_ms(millis.max(1)).await;
        }
    }

    /// Serialize and send one message. Returns `false` if it was lost.
    async fn emit(&mut self, sender: &dyn Periodic) -> bool {
        let mut buffer = [0u8; MAX_FAST_PACKET_PAYLOAD];
        let len = match sender.on_tick(&mut buffer) {
            Ok(len) => len,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("PGN {} serialization failed", sender.pgn());
                return false;
            }
        };

        let header = PgnHeader {
            pgn: sender.pgn(),
            priority: sender.priority(),
            source_address: self.source_address,
            fast_packet: sender.fast_packet(),
        };
        let sequence_id = self.sequence_id;
        if header.fast_packet || len > 8 {
            self.sequence_id = (self.sequence_id + 1) & 0x07;
        }

        match self
            .can
            .send_payload(header, &buffer[..len], sequence_id, &mut self.timer)
            .await
        {
            Ok(_) => true,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("PGN {} send failed: {}", header.pgn, defmt::Debug2Format(&_err));
                false
            }
        }
    }
}

/// Deadline following `due`. Re-anchors on `now` when more than one interval
/// was missed.
fn next_deadline(due: Instant, interval: Duration, now: Instant) -> Instant {
    let next = due + interval;
    if next <= now {
        now + interval
    } else {
        next
    }
}
