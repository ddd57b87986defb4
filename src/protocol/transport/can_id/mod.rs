//! 29-bit CAN identifiers for broadcast NMEA 2000 messages (SAE J1939 PDU2).
//!
//! Every PGN published by the board is a PDU2 broadcast: the PS byte is part
//! of the PGN and there is no destination address.
use crate::error::CanIdBuildError;

/// Highest PGN value (18 bits: R, DP, PF, PS).
pub const MAX_PGN: u32 = 0x3_FFFF;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Extended CAN identifier (29 bits) with accessors for priority, PGN and source.
pub struct CanId(pub u32);

impl CanId {
    /// Creates a `CanIdBuilder` for a PGN and source address (priority 6).
    pub fn builder(pgn: u32, source_address: u8) -> CanIdBuilder {
        CanIdBuilder::new(pgn, source_address)
    }

    /// Priority (3 bits, 0 is the highest).
    pub fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// 18-bit PGN. PDU1 identifiers have their destination byte masked out.
    pub fn pgn(&self) -> u32 {
        let raw = (self.0 >> 8) & MAX_PGN;
        if self.is_broadcast() {
            raw
        } else {
            raw & !0xFF
        }
    }

    /// True for PDU2 identifiers (PF >= 240).
    pub fn is_broadcast(&self) -> bool {
        ((self.0 >> 16) & 0xFF) >= 240
    }

    /// Eight-bit source address of the sending node.
    pub fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}
//==================================================================================CAN_ID_BUILDER
#[derive(Debug, Clone, Copy)]
/// Builder that enforces the PDU2 broadcast rules.
pub struct CanIdBuilder {
    pub priority: u8,
    pub pgn: u32,
    pub source_address: u8,
}

impl CanIdBuilder {
    pub fn new(pgn: u32, source_address: u8) -> Self {
        Self {
            priority: 6, // Default priority
            pgn,
            source_address,
        }
    }

    /// Sets the priority; only the low 3 bits are kept.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// Builds `priority << 26 | pgn << 8 | source`.
    ///
    /// Fails when the PGN does not fit in 18 bits or when its PF byte is
    /// below 240 (addressed PDU1 PGNs cannot be broadcast).
    pub fn build(self) -> Result<CanId, CanIdBuildError> {
        if self.pgn > MAX_PGN {
            return Err(CanIdBuildError::InvalidPgn);
        }
        let pf = (self.pgn >> 8) & 0xFF;
        if pf < 240 {
            return Err(CanIdBuildError::InvalidForBroadcast);
        }

        Ok(CanId(
            ((self.priority as u32) << 26) | (self.pgn << 8) | (self.source_address as u32),
        ))
    }
}
