use crate::core::{FieldDescriptor, FieldKind, PgnDescriptor, PgnValue};
use crate::infra::codec::traits::{FieldAccess, PgnData};
use crate::protocol::lookups::FluidType;

use super::{assign_f64, assign_u8, optional_f64};

#[derive(Debug, PartialEq, Copy, Clone, Default)]
/// Fluid Level
pub struct Pgn127505 {
    /// Tank instance, 0 to 13.
    pub instance: u8,
    /// Lookup Enum: FluidType
    pub fluid_type: FluidType,
    /// Fill level, percent of capacity.
    pub level: Option<f64>,
    /// Tank capacity, liters.
    pub capacity: Option<f64>,
}

impl Pgn127505 {
    pub const PGN_127505_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
        id: 127505,
        name: "fluidLevel",
        priority: 6,
        fastpacket: false,
        length: 8,
        trans_interval: 2500,
        fields: &[
            FieldDescriptor {
                id: "instance",
                name: "Instance",
                kind: FieldKind::Lookup,
                bits_length: 4,
                bits_offset: 0,
                is_signed: false,
                resolution: None,
                physical_unit: None,
            },
            FieldDescriptor {
                id: "type",
                name: "Type",
                kind: FieldKind::Lookup,
                bits_length: 4,
                bits_offset: 4,
                is_signed: false,
                resolution: None,
                physical_unit: None,
            },
            FieldDescriptor {
                id: "level",
                name: "Level",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 8,
                is_signed: true,
                resolution: Some(0.004),
                physical_unit: Some("%"),
            },
            FieldDescriptor {
                id: "capacity",
                name: "Capacity",
                kind: FieldKind::Number,
                bits_length: 32,
                bits_offset: 24,
                is_signed: false,
                resolution: Some(0.1),
                physical_unit: Some("L"),
            },
            FieldDescriptor {
                id: "reserved",
                name: "Reserved",
                kind: FieldKind::Reserved,
                bits_length: 8,
                bits_offset: 56,
                is_signed: false,
                resolution: None,
                physical_unit: None,
            },
        ],
    };

    pub fn new(instance: u8, fluid_type: FluidType, capacity: f64) -> Self {
        Self {
            instance,
            fluid_type,
            level: None,
            capacity: Some(capacity),
        }
    }
}

impl PgnData for Pgn127505 {
    const DESCRIPTOR: &'static PgnDescriptor = &Self::PGN_127505_DESCRIPTOR;
}

impl FieldAccess for Pgn127505 {
    fn field(&self, id: &'static str) -> Option<PgnValue> {
        match id {
            "instance" => Some(PgnValue::U8(self.instance)),
            "type" => Some(PgnValue::U8(u8::from(self.fluid_type))),
            "level" => Some(optional_f64(self.level)),
            "capacity" => Some(optional_f64(self.capacity)),
            _ => None,
        }
    }

    fn field_mut(&mut self, id: &'static str, value: PgnValue) -> Option<()> {
        match id {
            "instance" => assign_u8(&mut self.instance, value),
            "type" => {
                if let PgnValue::U8(val) = value {
                    match FluidType::try_from(val) {
                        Ok(enum_val) => {
                            self.fluid_type = enum_val;
                            Some(())
                        }
                        Err(_) => None,
                    }
                } else {
                    None
                }
            }
            "level" => assign_f64(&mut self.level, value),
            "capacity" => assign_f64(&mut self.capacity, value),
            _ => None,
        }
    }
}
