//! Bit cursors over CAN payload buffers.
//!
//! NMEA 2000 packs fields least-significant bit first and fields seldom align
//! with byte boundaries (PGN 127505 stores its instance and fluid type in two
//! nibbles of the same byte), so both cursors work one bit run at a time.
use crate::error::{BitReaderError, BitWriterError};

/// Reader that extracts little-endian bit runs from a `&[u8]` without copies.
pub struct BitReader<'a> {
    buffer: &'a [u8],
    /// Number of bits consumed from the start of the buffer.
    bit_cursor: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the start of the provided buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Bits left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() * 8 - self.bit_cursor
    }

    /// Read `num_bits` (1..=64) bits starting at the cursor.
    pub fn read_u64(&mut self, num_bits: u8) -> Result<u64, BitReaderError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitReaderError::TooLongForType { asked: num_bits });
        }
        if num_bits as usize > self.remaining() {
            return Err(BitReaderError::OutOfBounds {
                asked: num_bits as usize,
                available: self.remaining(),
            });
        }

        let mut result: u64 = 0;
        let mut done: usize = 0;
        let wanted = num_bits as usize;

        while done < wanted {
            let position = self.bit_cursor + done;
            let shift = position % 8;
            let run = (8 - shift).min(wanted - done);
            let mask = ((1u16 << run) - 1) as u8;
            let bits = (self.buffer[position / 8] >> shift) & mask;
            result |= (bits as u64) << done;
            done += run;
        }

        self.bit_cursor += wanted;
        Ok(result)
    }

    /// Move the cursor forward without decoding (reserved fields).
    pub fn skip(&mut self, num_bits: u8) -> Result<(), BitReaderError> {
        if num_bits as usize > self.remaining() {
            return Err(BitReaderError::OutOfBounds {
                asked: num_bits as usize,
                available: self.remaining(),
            });
        }
        self.bit_cursor += num_bits as usize;
        Ok(())
    }
}
//==================================================================================BITWRITER

/// Writer that lays little-endian bit runs into a `&mut [u8]`.
pub struct BitWriter<'a> {
    buffer: &'a mut [u8],
    /// Number of bits written from the start of the buffer.
    bit_cursor: usize,
}

impl<'a> BitWriter<'a> {
    /// Create a writer positioned at the start of the buffer.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Cursor position in bits; rounds up to the payload length.
    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    fn remaining(&self) -> usize {
        self.buffer.len() * 8 - self.bit_cursor
    }

    /// Write the `num_bits` (1..=64) low bits of `value`.
    pub fn write_u64(&mut self, value: u64, num_bits: u8) -> Result<(), BitWriterError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitWriterError::TooLongForType { asked: num_bits });
        }
        if num_bits as usize > self.remaining() {
            return Err(BitWriterError::OutOfBounds {
                asked: num_bits as usize,
                available: self.remaining(),
            });
        }

        let wanted = num_bits as usize;
        let mut pending = value;
        let mut done: usize = 0;

        while done < wanted {
            let position = self.bit_cursor + done;
            let shift = position % 8;
            let run = (8 - shift).min(wanted - done);
            let mask = ((1u16 << run) - 1) as u8;
            let byte = &mut self.buffer[position / 8];
            *byte &= !(mask << shift);
            *byte |= (pending as u8 & mask) << shift;
            pending >>= run;
            done += run;
        }

        self.bit_cursor += wanted;
        Ok(())
    }

    /// Move the cursor forward, leaving the underlying bits untouched.
    pub fn skip(&mut self, num_bits: u8) -> Result<(), BitWriterError> {
        if num_bits as usize > self.remaining() {
            return Err(BitWriterError::OutOfBounds {
                asked: num_bits as usize,
                available: self.remaining(),
            });
        }
        self.bit_cursor += num_bits as usize;
        Ok(())
    }
}
