//! Minimal abstraction for an asynchronous CAN bus. Lets the telemetry
//! runner plug into any driver (embassy HAL, SocketCAN, test double).
use crate::protocol::transport::can_frame::CanFrame;
use core::future::Future;

/// Contract to emit CAN frames asynchronously.
///
/// Arbitration and frame-level retries belong to the driver; a returned
/// error means the frame is lost.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Emit a frame on the bus.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
}
