use crate::core::{FieldDescriptor, FieldKind, PgnDescriptor, PgnValue};
use crate::infra::codec::traits::{FieldAccess, PgnData};
use crate::protocol::lookups::{EngineStatus1, EngineStatus2};

use super::{
    assign_f64, assign_i8, assign_u16, assign_u32, assign_u8, optional_f64, optional_i8,
    optional_u32,
};

#[derive(Debug, PartialEq, Copy, Clone, Default)]
/// Engine Parameters, Dynamic
/// Sent as Fast Packet: the payload is 26 bytes long.
pub struct Pgn127489 {
    pub instance: u8,
    /// Oil pressure, Pa.
    pub oil_pressure: Option<f64>,
    /// Oil temperature, K.
    pub oil_temperature: Option<f64>,
    /// Coolant temperature, K.
    pub temperature: Option<f64>,
    /// Alternator potential, V.
    pub alternator_potential: Option<f64>,
    /// Fuel rate, L/h.
    pub fuel_rate: Option<f64>,
    /// Total engine hours, seconds.
    pub total_engine_hours: Option<u32>,
    /// Coolant pressure, Pa.
    pub coolant_pressure: Option<f64>,
    /// Fuel pressure, Pa.
    pub fuel_pressure: Option<f64>,
    /// Bit Lookup Enum: EngineStatus1
    pub discrete_status1: u16,
    /// Bit Lookup Enum: EngineStatus2
    pub discrete_status2: u16,
    /// Percent engine load.
    pub engine_load: Option<i8>,
    /// Percent engine torque.
    pub engine_torque: Option<i8>,
}

impl Pgn127489 {
    pub const PGN_127489_DESCRIPTOR: PgnDescriptor = PgnDescriptor {
        id: 127489,
        name: "engineParametersDynamic",
        priority: 2,
        fastpacket: true,
        length: 26,
        trans_interval: 500,
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
                id: "oilPressure",
                name: "Oil pressure",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 8,
                is_signed: false,
                resolution: Some(100.0),
                physical_unit: Some("Pa"),
            },
            FieldDescriptor {
                id: "oilTemperature",
                name: "Oil temperature",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 24,
                is_signed: false,
                resolution: Some(0.1),
                physical_unit: Some("K"),
            },
            FieldDescriptor {
                id: "temperature",
                name: "Temperature",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 40,
                is_signed: false,
                resolution: Some(0.01),
                physical_unit: Some("K"),
            },
            FieldDescriptor {
                id: "alternatorPotential",
                name: "Alternator Potential",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 56,
                is_signed: true,
                resolution: Some(0.01),
                physical_unit: Some("V"),
            },
            FieldDescriptor {
                id: "fuelRate",
                name: "Fuel Rate",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 72,
                is_signed: true,
                resolution: Some(0.1),
                physical_unit: Some("L/h"),
            },
            FieldDescriptor {
                id: "totalEngineHours",
                name: "Total Engine hours",
                kind: FieldKind::Number,
                bits_length: 32,
                bits_offset: 88,
                is_signed: false,
                resolution: None,
                physical_unit: Some("s"),
            },
            FieldDescriptor {
                id: "coolantPressure",
                name: "Coolant Pressure",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 120,
                is_signed: false,
                resolution: Some(100.0),
                physical_unit: Some("Pa"),
            },
            FieldDescriptor {
                id: "fuelPressure",
                name: "Fuel Pressure",
                kind: FieldKind::Number,
                bits_length: 16,
                bits_offset: 136,
                is_signed: false,
                resolution: Some(1000.0),
                physical_unit: Some("Pa"),
            },
            FieldDescriptor {
                id: "reserved",
                name: "Reserved",
                kind: FieldKind::Reserved,
                bits_length: 8,
                bits_offset: 152,
                is_signed: false,
                resolution: None,
                physical_unit: None,
            },
            FieldDescriptor {
                id: "discreteStatus1",
                name: "Discrete Status 1",
                kind: FieldKind::BitLookup,
                bits_length: 16,
                bits_offset: 160,
                is_signed: false,
                resolution: None,
                physical_unit: None,
            },
            FieldDescriptor {
                id: "discreteStatus2",
                name: "Discrete Status 2",
                kind: FieldKind::BitLookup,
                bits_length: 16,
                bits_offset: 176,
                is_signed: false,
                resolution: None,
                physical_unit: None,
            },
            FieldDescriptor {
                id: "engineLoad",
                name: "Engine Load",
                kind: FieldKind::Number,
                bits_length: 8,
                bits_offset: 192,
                is_signed: true,
                resolution: None,
                physical_unit: Some("%"),
            },
            FieldDescriptor {
                id: "engineTorque",
                name: "Engine Torque",
                kind: FieldKind::Number,
                bits_length: 8,
                bits_offset: 200,
                is_signed: true,
                resolution: None,
                physical_unit: Some("%"),
            },
        ],
    };

    pub fn new(instance: u8) -> Self {
        Self {
            instance,
            ..Self::default()
        }
    }

    /// Returns true when the specified bit is set in discrete_status1
    pub fn get_discrete_status1_bit(&self, bit: EngineStatus1) -> bool {
        (self.discrete_status1 & bit.mask()) != 0
    }

    /// Enable or disable the specified bit in discrete_status1
    pub fn set_discrete_status1_bit(&mut self, bit: EngineStatus1, value: bool) {
        if value {
            self.discrete_status1 |= bit.mask();
        } else {
            self.discrete_status1 &= !bit.mask();
        }
    }

    /// Returns true when the specified bit is set in discrete_status2
    pub fn get_discrete_status2_bit(&self, bit: EngineStatus2) -> bool {
        (self.discrete_status2 & bit.mask()) != 0
    }

    /// Enable or disable the specified bit in discrete_status2
    pub fn set_discrete_status2_bit(&mut self, bit: EngineStatus2, value: bool) {
        if value {
            self.discrete_status2 |= bit.mask();
        } else {
            self.discrete_status2 &= !bit.mask();
        }
    }
}

impl PgnData for Pgn127489 {
    const DESCRIPTOR: &'static PgnDescriptor = &Self::PGN_127489_DESCRIPTOR;
}

impl FieldAccess for Pgn127489 {
    fn field(&self, id: &'static str) -> Option<PgnValue> {
        match id {
            "instance" => Some(PgnValue::U8(self.instance)),
            "oilPressure" => Some(optional_f64(self.oil_pressure)),
            "oilTemperature" => Some(optional_f64(self.oil_temperature)),
            "temperature" => Some(optional_f64(self.temperature)),
            "alternatorPotential" => Some(optional_f64(self.alternator_potential)),
            "fuelRate" => Some(optional_f64(self.fuel_rate)),
            "totalEngineHours" => Some(optional_u32(self.total_engine_hours)),
            "coolantPressure" => Some(optional_f64(self.coolant_pressure)),
            "fuelPressure" => Some(optional_f64(self.fuel_pressure)),
            "discreteStatus1" => Some(PgnValue::U16(self.discrete_status1)),
            "discreteStatus2" => Some(PgnValue::U16(self.discrete_status2)),
            "engineLoad" => Some(optional_i8(self.engine_load)),
            "engineTorque" => Some(optional_i8(self.engine_torque)),
            _ => None,
        }
    }

    fn field_mut(&mut self, id: &'static str, value: PgnValue) -> Option<()> {
        match id {
            "instance" => assign_u8(&mut self.instance, value),
            "oilPressure" => assign_f64(&mut self.oil_pressure, value),
            "oilTemperature" => assign_f64(&mut self.oil_temperature, value),
            "temperature" => assign_f64(&mut self.temperature, value),
            "alternatorPotential" => assign_f64(&mut self.alternator_potential, value),
            "fuelRate" => assign_f64(&mut self.fuel_rate, value),
            "totalEngineHours" => assign_u32(&mut self.total_engine_hours, value),
            "coolantPressure" => assign_f64(&mut self.coolant_pressure, value),
            "fuelPressure" => assign_f64(&mut self.fuel_pressure, value),
            "discreteStatus1" => assign_u16(&mut self.discrete_status1, value),
            "discreteStatus2" => assign_u16(&mut self.discrete_status2, value),
            "engineLoad" => assign_i8(&mut self.engine_load, value),
            "engineTorque" => assign_i8(&mut self.engine_torque, value),
            _ => None,
        }
    }
}
