//! CAN frame generator for broadcast PGNs. Builds the required frame sequence
//! (single frame or Fast Packet) from a serialized payload.
//!
//! Fast Packet layout: every frame starts with `sequence << 5 | frame_index`;
//! the first frame then carries the total length and six payload bytes, the
//! following frames seven payload bytes each. Unused bytes are `0xFF`.
use crate::error::CanIdBuildError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::fast_packet::MAX_FAST_PACKET_PAYLOAD;

#[derive(Debug, Clone, Copy)]
/// Shared parameters for all frames composing one message.
pub struct FastPacketBuilder<'a> {
    pgn: u32,
    priority: u8,
    source_address: u8,
    payload: &'a [u8],
    sequence_id: u8,
    /// Forces Fast Packet framing even for payloads of eight bytes or less.
    force_fast_packet: bool,
}

/// Lazy iterator returning frames one by one as they are encoded.
pub struct FrameIterator<'a> {
    builder: FastPacketBuilder<'a>,
    frame_index: u8,
    bytes_sent: usize,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = Result<CanFrame, CanIdBuildError>;

    fn next(&mut self) -> Option<Self::Item> {
        let total_len = self.builder.payload.len();
        if self.bytes_sent >= total_len {
            return None;
        }

        if total_len > MAX_FAST_PACKET_PAYLOAD {
            self.bytes_sent = total_len;
            return Some(Err(CanIdBuildError::PayloadTooLarge { len: total_len }));
        }

        let id = match CanId::builder(self.builder.pgn, self.builder.source_address)
            .with_priority(self.builder.priority)
            .build()
        {
            Ok(id) => id,
            Err(e) => {
                self.bytes_sent = total_len;
                return Some(Err(e));
            }
        };

        let mut data = [0xFF; 8];

        // Single-frame message: the payload goes out as is.
        if !self.builder.is_fast_packet() {
            data[..total_len].copy_from_slice(self.builder.payload);
            self.bytes_sent = total_len;
            return Some(Ok(CanFrame { id, data, len: 8 }));
        }

        data[0] = (self.builder.sequence_id << 5) | (self.frame_index & 0x1F);
        if self.bytes_sent == 0 {
            data[1] = total_len as u8;
            let bytes_to_copy = 6.min(total_len);
            data[2..2 + bytes_to_copy].copy_from_slice(&self.builder.payload[..bytes_to_copy]);
            self.bytes_sent = bytes_to_copy;
        } else {
            let bytes_to_copy = 7.min(total_len - self.bytes_sent);
            data[1..1 + bytes_to_copy].copy_from_slice(
                &self.builder.payload[self.bytes_sent..self.bytes_sent + bytes_to_copy],
            );
            self.bytes_sent += bytes_to_copy;
        }
        self.frame_index = self.frame_index.wrapping_add(1);

        // NMEA 2000 frames always carry eight bytes, padding included.
        Some(Ok(CanFrame { id, data, len: 8 }))
    }
}

impl<'a> FastPacketBuilder<'a> {
    /// Frame builder for a broadcast PGN. Payloads longer than eight bytes are
    /// segmented with sequence identifier 0 unless overridden.
    pub fn new(pgn: u32, priority: u8, source_address: u8, payload: &'a [u8]) -> Self {
        Self {
            pgn,
            priority,
            source_address,
            payload,
            sequence_id: 0,
            force_fast_packet: false,
        }
    }

    /// Sets the 3-bit Fast Packet sequence identifier. Senders keep one
    /// counter per transmitter and advance it for every message.
    pub fn with_sequence_id(mut self, sequence_id: u8) -> Self {
        self.sequence_id = sequence_id & 0x07;
        self
    }

    /// Use Fast Packet framing regardless of the payload length, for PGNs the
    /// database declares as Fast Packet.
    pub fn fast_packet(mut self, enabled: bool) -> Self {
        self.force_fast_packet = enabled;
        self
    }

    fn is_fast_packet(&self) -> bool {
        self.force_fast_packet || self.payload.len() > 8
    }

    /// Number of frames the message will use.
    pub fn frame_count(&self) -> usize {
        let len = self.payload.len();
        if !self.is_fast_packet() || len <= 6 {
            1
        } else {
            1 + (len - 6).div_ceil(7)
        }
    }

    /// Start the iteration; each call to `next` yields the next frame.
    pub fn build(self) -> FrameIterator<'a> {
        FrameIterator {
            builder: self,
            frame_index: 0,
            bytes_sent: 0,
        }
    }
}
