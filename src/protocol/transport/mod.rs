//! NMEA 2000 transport layer: CAN frame representation, 29-bit identifier
//! construction, Fast Packet segmentation, and bus abstraction traits.

pub mod can_frame;
pub mod can_id;
pub mod fast_packet;
pub mod traits;

/// Delay between two frames of the same Fast Packet message (ms).
///
/// NMEA 2000 allows back-to-back frames, but embedded CAN controllers with
/// small TX queues (ESP32 TWAI holds three frames) drop frames without it.
pub const FAST_PACKET_INTER_FRAME_DELAY_MS: u32 = 2;

/// Recommended upper bound for a single `CanBus::send` (ms).
///
/// [`CanBus`](traits::can_bus::CanBus) implementations **SHOULD** enforce it
/// so a disconnected bus does not stall the telemetry runner.
///
/// ```rust,ignore
/// async fn send(&mut self, frame: &CanFrame) -> Result<(), Error> {
///     with_timeout(
///         Duration::from_millis(CAN_SEND_TIMEOUT_MS as u64),
///         self.can.transmit_async(&frame.to_embedded().ok_or(Error::Frame)?),
///     )
///     .await
///     .map_err(|_| Error::Timeout)?
/// }
/// ```
pub const CAN_SEND_TIMEOUT_MS: u32 = 100;
