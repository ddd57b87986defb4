use crate::core::{FieldDescriptor, FieldKind, PgnDescriptor, PgnValue};
use crate::infra::codec::traits::{FieldAccess, PgnData};

use super::{assign_f64, assign_i8, assign_u8, optional_f64, optional_i8};

#[derive(Debug, PartialEq, Copy, Clone, Default)]
/// Engine Parameters, Rapid Update
pub struct Pgn127488 {
    /// Engine instance (0 = single engine or port).
    pub instance: u8,
    /// Engine speed, rpm.
    pub speed: Option<f64>,
    /// Turbo boost pressure, Pa.
    pub boost_pressure: Option<f64>,
    /// Drive tilt/trim, percent.
    pub tilt_trim: Option<i8>,
}

impl Pgn127488 {
    pub const PGN_127488_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
        id: 127488,
        name: "engineParametersRapidUpdate",
        priority: 2,
        fastpacket: false,
        length: 8,
        trans_interval: 100,
        fields: &[
            FieldDescriptor {
                id: "instance",
                name: "Instance",
                kind: FieldKind::Lookup,
                bits_length: 8,
                bits_offset: 0,
                is_signed: false,
                resolution: None,
                physical_unit: None,
            },
            FieldDescriptor {
                id: "speed",
                name: "Speed",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 8,
                is_signed: false,
                resolution: Some(0.25),
                physical_unit: Some("rpm"),
            },
            FieldDescriptor {
                id: "boostPressure",
                name: "Boost Pressure",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 24,
                is_signed: false,
                resolution: Some(100.0),
                physical_unit: Some("Pa"),
            },
            FieldDescriptor {
                id: "tiltTrim",
                name: "Tilt/Trim",
                kind: FieldKind::Number,
                bits_length: 8,
                bits_offset: 40,
                is_signed: true,
                resolution: None,
                physical_unit: Some("%"),
            },
            FieldDescriptor {
                id: "reserved",
                name: "Reserved",
                kind: FieldKind::Reserved,
                bits_length: 16,
                bits_offset: 48,
                is_signed: false,
                resolution: None,
                physical_unit: None,
            },
        ],
    };

    /// Message for `instance` with every measurement unavailable.
    pub fn new(instance: u8) -> Self {
        Self {
            instance,
            ..Self::default()
        }
    }
}

impl PgnData for Pgn127488 {
    const DESCRIPTOR: &'static PgnDescriptor = &Self::PGN_127488_DESCRIPTOR;
}

impl FieldAccess for Pgn127488 {
    fn field(&self, id: &'static str) -> Option<PgnValue> {
        match id {
            "instance" => Some(PgnValue::U8(self.instance)),
            "speed" => Some(optional_f64(self.speed)),
            "boostPressure" => Some(optional_f64(self.boost_pressure)),
            "tiltTrim" => Some(optional_i8(self.tilt_trim)),
            _ => None,
        }
    }

    fn field_mut(&mut self, id: &'static str, value: PgnValue) -> Option<()> {
        match id {
            "instance" => assign_u8(&mut self.instance, value),
            "speed" => assign_f64(&mut self.speed, value),
            "boostPressure" => assign_f64(&mut self.boost_pressure, value),
            "tiltTrim" => assign_i8(&mut self.tilt_trim, value),
            _ => None,
        }
    }
}
