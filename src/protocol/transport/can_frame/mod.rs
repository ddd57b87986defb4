//! In-memory representation of an NMEA 2000 CAN frame and its bridge to the
//! `embedded-can` HAL types.
use embedded_can::{ExtendedId, Frame};

use crate::protocol::transport::can_id::CanId;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Classic CAN frame as handed to the bus driver.
pub struct CanFrame {
    /// Full 29-bit CAN identifier stored inside a `u32`.
    pub id: CanId,
    /// Payload buffer. Unused bytes are padded with `0xFF`.
    pub data: [u8; 8],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Valid bytes of the payload.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(8)]
    }

    /// Converts into a HAL frame with an extended identifier.
    ///
    /// Returns `None` when the HAL rejects the identifier or the length.
    pub fn to_embedded<F: Frame>(&self) -> Option<F> {
        let id = ExtendedId::new(self.id.0)?;
        F::new(id, self.payload())
    }
}
