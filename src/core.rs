//! Defines the "data contract" between the hand-described PGN layouts in
//! `protocol::messages` (the tables) and the serialization/deserialization
//! engine (the interpreter).
//!
//! Each message exposes a static [`PgnDescriptor`]; the engine walks its
//! fields to pack or unpack the binary payload.

/// Semantic type of a field within a PGN.
/// Mirrors the `FieldType` names used by the CANboat PGN database.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    /// Signed or unsigned integer, optionally scaled by `resolution`.
    /// The all-ones raw value (maximum positive value when signed) means
    /// "not available".
    Number,
    /// Value is an index into a dedicated enumeration (instances, fluid types).
    Lookup,
    /// Bitfield where each individual bit is a flag.
    BitLookup,
    /// Reserved bits: skipped when reading, set to `1` when writing.
    Reserved,
}

/// Descriptor for a single PGN field.
#[derive(Debug)]
pub struct FieldDescriptor {
    /// 1. Field identifier, as used by [`FieldAccess`](crate::infra::codec::traits::FieldAccess).
    pub id: &'static str,
    /// 2. Human-readable name.
    pub name: &'static str,
    /// 3. Semantic type for the field.
    pub kind: FieldKind,
    /// 4. Field bit length.
    pub bits_length: u8,
    /// 5. Absolute bit offset of the first bit.
    pub bits_offset: u16,
    /// 6. Whether the raw number is two's complement.
    pub is_signed: bool,
    /// 7. Resolution factor, when the field carries a scaled physical value.
    pub resolution: Option<f64>,
    /// 8. Physical unit of the decoded value (e.g. "Pa", "K", "rpm").
    pub physical_unit: Option<&'static str>,
}

/// Descriptor for an entire PGN layout.
#[derive(Debug)]
pub struct PgnDescriptor {
    /// 1. PGN identifier.
    pub id: u32,
    /// 2. PGN name (diagnostics).
    pub name: &'static str,
    /// 3. Default message priority.
    pub priority: u8,
    /// 4. Whether the message is Fast Packet or Single Frame.
    pub fastpacket: bool,
    /// 5. Payload length in bytes.
    pub length: u16,
    /// 6. Standard transmission interval in milliseconds.
    pub trans_interval: u16,
    /// 7. Ordered list of field descriptors.
    pub fields: &'static [FieldDescriptor],
}

impl PgnDescriptor {
    /// Sum of the field bit lengths; must equal `length * 8`.
    pub const fn bits_length(&self) -> usize {
        let mut total = 0usize;
        let mut idx = 0;
        while idx < self.fields.len() {
            total += self.fields[idx].bits_length as usize;
            idx += 1;
        }
        total
    }
}

/// Dynamic value exchanged between message structs and the codec engine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PgnValue {
    U32(u32),
    U16(u16),
    U8(u8),
    I16(i16),
    I8(i8),
    F64(f64),
    /// Field carries no valid data; encoded with the reserved raw value.
    NotAvailable,
}
