/// Test doubles to simulate the CAN bus, the clock and the timer during
/// integration tests.
use halmet_n2k::infra::clock::ManualClock;
use halmet_n2k::protocol::transport::{
    can_frame::CanFrame,
    traits::{can_bus::CanBus, n2k_timer::N2kTimer},
};
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
/// Error returned by [`MockCanBus`] while it refuses frames.
pub struct BusOff;

#[derive(Clone, Default)]
#[allow(dead_code)]
/// In-memory CAN bus recording every frame it accepts. Clones share the
/// same recording, so a test can keep a handle while the scheduler owns the
/// bus.
pub struct MockCanBus {
    frames: Rc<RefCell<Vec<CanFrame>>>,
    refuse: Rc<Cell<bool>>,
    refused: Rc<Cell<usize>>,
}

#[allow(dead_code)]
impl MockCanBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following frame with [`BusOff`].
    pub fn set_refuse(&self, refuse: bool) {
        self.refuse.set(refuse);
    }

    pub fn frames(&self) -> Vec<CanFrame> {
        self.frames.borrow().clone()
    }

    pub fn frames_for(&self, pgn: u32) -> Vec<CanFrame> {
        self.frames
            .borrow()
            .iter()
            .filter(|frame| frame.id.pgn() == pgn)
            .cloned()
            .collect()
    }

    pub fn refused(&self) -> usize {
        self.refused.get()
    }

    pub fn clear(&self) {
        self.frames.borrow_mut().clear();
    }
}

impl CanBus for MockCanBus {
    type Error = BusOff;

    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a {
        let result = if self.refuse.get() {
            self.refused.set(self.refused.get() + 1);
            Err(BusOff)
        } else {
            self.frames.borrow_mut().push(frame.clone());
            Ok(())
        };
        std::future::ready(result)
    }
}

#[allow(dead_code)]
/// Timer that moves a [`ManualClock`] forward instead of sleeping, so a
/// scheduler can run through hours of simulated time instantly.
pub struct VirtualTimer<'c> {
    clock: &'c ManualClock,
    slept_ms: u64,
}

#[allow(dead_code)]
impl<'c> VirtualTimer<'c> {
    pub fn new(clock: &'c ManualClock) -> Self {
        Self { clock, slept_ms: 0 }
    }

    pub fn slept_ms(&self) -> u64 {
        self.slept_ms
    }
}

impl N2kTimer for VirtualTimer<'_> {
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl Future<Output = ()> + 'a {
        self.slept_ms += millis as u64;
        self.clock
            .advance(embassy_time::Duration::from_millis(millis as u64));
        std::future::ready(())
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive real delays in tests.
pub struct MockTimer;

impl N2kTimer for MockTimer {
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl Future<Output = ()> + 'a {
        sleep(Duration::from_millis(millis as u64))
    }
}

#[allow(dead_code)]
/// Payload carried by a complete Fast Packet sequence.
pub fn reassemble(frames: &[CanFrame]) -> Vec<u8> {
    let total = frames[0].data[1] as usize;
    let mut payload = Vec::with_capacity(total);
    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame.data[0] & 0x1F, index as u8, "frame out of order");
        let chunk = if index == 0 {
            &frame.data[2..]
        } else {
            &frame.data[1..]
        };
        let take = chunk.len().min(total - payload.len());
        payload.extend_from_slice(&chunk[..take]);
    }
    payload
}

#[allow(dead_code)]
/// Split a Fast Packet frame stream of one PGN into complete messages.
pub fn fast_packet_messages(frames: &[CanFrame]) -> Vec<Vec<u8>> {
    let mut messages = Vec::new();
    let mut start = 0;
    for index in 1..=frames.len() {
        let boundary = index == frames.len() || frames[index].data[0] & 0x1F == 0;
        if boundary {
            messages.push(reassemble(&frames[start..index]));
            start = index;
        }
    }
    messages
}
