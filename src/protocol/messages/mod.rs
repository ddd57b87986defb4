//! Message structures for the PGNs published by the board.
//!
//! Each struct carries a hand-described [`PgnDescriptor`](crate::core::PgnDescriptor)
//! (layout taken from the CANboat PGN database) and implements
//! [`PgnData`](crate::infra::codec::traits::PgnData) /
//! [`FieldAccess`](crate::infra::codec::traits::FieldAccess) so the codec
//! engine can pack and unpack it. Optional fields map `None` to the
//! "not available" raw value.
mod engine_dynamic;
mod engine_rapid;
mod fluid_level;

pub use engine_dynamic::Pgn127489;
pub use engine_rapid::Pgn127488;
pub use fluid_level::Pgn127505;

use crate::core::PgnValue;

//==================================================================================FIELD_HELPERS
fn optional_f64(value: Option<f64>) -> PgnValue {
    value.map_or(PgnValue::NotAvailable, PgnValue::F64)
}

fn optional_i8(value: Option<i8>) -> PgnValue {
    value.map_or(PgnValue::NotAvailable, PgnValue::I8)
}

fn optional_u32(value: Option<u32>) -> PgnValue {
    value.map_or(PgnValue::NotAvailable, PgnValue::U32)
}

fn assign_f64(slot: &mut Option<f64>, value: PgnValue) -> Option<()> {
    match value {
        PgnValue::F64(val) => *slot = Some(val),
        PgnValue::NotAvailable => *slot = None,
        _ => return None,
    }
    Some(())
}

fn assign_i8(slot: &mut Option<i8>, value: PgnValue) -> Option<()> {
    match value {
        PgnValue::I8(val) => *slot = Some(val),
        PgnValue::NotAvailable => *slot = None,
        _ => return None,
    }
    Some(())
}

fn assign_u32(slot: &mut Option<u32>, value: PgnValue) -> Option<()> {
    match value {
        PgnValue::U32(val) => *slot = Some(val),
        PgnValue::NotAvailable => *slot = None,
        _ => return None,
    }
    Some(())
}

fn assign_u8(slot: &mut u8, value: PgnValue) -> Option<()> {
    if let PgnValue::U8(val) = value {
        *slot = val;
        Some(())
    } else {
        None
    }
}

fn assign_u16(slot: &mut u16, value: PgnValue) -> Option<()> {
    if let PgnValue::U16(val) = value {
        *slot = val;
        Some(())
    } else {
        None
    }
}
