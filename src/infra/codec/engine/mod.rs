//! Generic serialization/deserialization engine driven by static PGN descriptors.
//! It controls the bit-level readers/writers and turns dynamic `PgnValue`s into
//! strongly typed message structures.
//!
//! Scaled numbers follow the NMEA 2000 conventions for reserved raw values:
//! the maximum raw value means "not available" and the one below it means
//! "out of range". A value that cannot be represented is sent as out of range
//! instead of being silently wrapped.
use super::bits::{BitReader, BitWriter};
use super::traits::FieldAccess;
use crate::core::{FieldDescriptor, FieldKind, PgnDescriptor, PgnValue};
use crate::error::{CodecError, DeserializationError, SerializationError};

/// Deserializes a payload into a PGN struct `T`.
///
/// # Parameters
/// * `instance` – object to populate field by field
/// * `payload` – raw buffer (reassembled when the PGN is Fast Packet)
/// * `descriptor` – static descriptor that defines the PGN layout
pub fn deserialize_into<T: FieldAccess>(
    instance: &mut T,
    payload: &[u8],
    descriptor: &'static PgnDescriptor,
) -> Result<(), DeserializationError> {
    if payload.len() < descriptor.length as usize {
        return Err(DeserializationError::InvalidDataLength);
    }

    let mut reader = BitReader::new(payload);

    for field_desc in descriptor.fields {
        if let Some(value) = read_field_value(&mut reader, field_desc)? {
            instance.field_mut(field_desc.id, value).ok_or(
                DeserializationError::FieldAssignmentFailed {
                    desc: field_desc.id,
                },
            )?
        }
    }

    Ok(())
}

/// Serializes a PGN struct `T` into a buffer.
///
/// The buffer is pre-filled with `0xFF` so reserved bits end up set.
/// Returns the number of bytes written.
pub fn serialize<T: FieldAccess>(
    pgn_instance: &T,
    buffer: &mut [u8],
    descriptor: &'static PgnDescriptor,
) -> Result<usize, SerializationError> {
    let length = descriptor.length as usize;
    let buffer = buffer
        .get_mut(..length)
        .ok_or(SerializationError::BufferTooSmall)?;
    buffer.fill(0xFF);

    let mut writer = BitWriter::new(buffer);

    for field_desc in descriptor.fields {
        if field_desc.kind == FieldKind::Reserved {
            writer
                .skip(field_desc.bits_length)
                .map_err(|e| SerializationError::BitWriteError { err: e })?;
            continue;
        }

        let value = pgn_instance
            .field(field_desc.id)
            .ok_or(SerializationError::FieldNotFound {
                field_id: field_desc.id,
            })?;
        let raw = encode_raw(field_desc, &value)?;
        writer
            .write_u64(raw, field_desc.bits_length)
            .map_err(|e| SerializationError::BitWriteError { err: e })?;
    }

    Ok(writer.bit_cursor().div_ceil(8))
}

/// Read a single field and apply signedness, resolution and the
/// "not available" convention.
fn read_field_value(
    reader: &mut BitReader,
    field_desc: &'static FieldDescriptor,
) -> Result<Option<PgnValue>, DeserializationError> {
    let bits = field_desc.bits_length;

    if field_desc.kind == FieldKind::Reserved {
        reader
            .skip(bits)
            .map_err(|e| DeserializationError::BitReaderError { err: e })?;
        return Ok(None);
    }

    let raw = reader
        .read_u64(bits)
        .map_err(|e| DeserializationError::BitReaderError { err: e })?;

    let value = match field_desc.kind {
        // Lookups and bit fields are plain unsigned indexes / masks.
        FieldKind::Lookup | FieldKind::BitLookup => unsigned_value(raw, bits),
        _ => {
            if raw == not_available_raw(field_desc) {
                PgnValue::NotAvailable
            } else if field_desc.is_signed {
                let signed = sign_extend(raw, bits);
                match field_desc.resolution {
                    Some(res) => PgnValue::F64(signed as f64 * res),
                    None if bits <= 8 => PgnValue::I8(signed as i8),
                    None => PgnValue::I16(signed as i16),
                }
            } else {
                match field_desc.resolution {
                    Some(res) => PgnValue::F64(raw as f64 * res),
                    None => unsigned_value(raw, bits),
                }
            }
        }
    };

    Ok(Some(value))
}

/// Turn a value into the raw bit pattern written for `field_desc`.
fn encode_raw(
    field_desc: &'static FieldDescriptor,
    value: &PgnValue,
) -> Result<u64, SerializationError> {
    if let PgnValue::NotAvailable = value {
        return Ok(not_available_raw(field_desc));
    }

    match field_desc.kind {
        FieldKind::Lookup | FieldKind::BitLookup => {
            let raw = pgn_value_to_u64(value)
                .map_err(|e| SerializationError::CodecError { source: e })?;
            if raw > field_mask(field_desc.bits_length) {
                return Err(SerializationError::ValueTooWide {
                    field_id: field_desc.id,
                });
            }
            Ok(raw)
        }
        _ => {
            let scaled = match field_desc.resolution {
                Some(res) => {
                    let float_val = pgn_value_to_f64(value)
                        .map_err(|e| SerializationError::CodecError { source: e })?;
                    if float_val.is_nan() {
                        return Ok(not_available_raw(field_desc));
                    }
                    round_to_i64(float_val / res)
                }
                None => pgn_value_to_i64(value)
                    .map_err(|e| SerializationError::CodecError { source: e })?,
            };

            let (min, max) = data_range(field_desc);
            if scaled < min || scaled > max {
                return Ok(out_of_range_raw(field_desc));
            }
            Ok((scaled as u64) & field_mask(field_desc.bits_length))
        }
    }
}

/// Reserved raw value meaning "data not available".
fn not_available_raw(field_desc: &FieldDescriptor) -> u64 {
    if field_desc.is_signed && field_desc.kind == FieldKind::Number {
        field_mask(field_desc.bits_length - 1)
    } else {
        field_mask(field_desc.bits_length)
    }
}

/// Reserved raw value meaning "out of range".
fn out_of_range_raw(field_desc: &FieldDescriptor) -> u64 {
    not_available_raw(field_desc) - 1
}

/// Inclusive range of raw values that carry data (reserved values excluded).
fn data_range(field_desc: &FieldDescriptor) -> (i64, i64) {
    let bits = field_desc.bits_length as u32;
    if field_desc.is_signed {
        let half = 1i64 << (bits - 1);
        (-half, half - 3)
    } else {
        (0, ((1u64 << bits) - 3) as i64)
    }
}

fn field_mask(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

fn unsigned_value(raw: u64, bits: u8) -> PgnValue {
    match bits {
        1..=8 => PgnValue::U8(raw as u8),
        9..=16 => PgnValue::U16(raw as u16),
        _ => PgnValue::U32(raw as u32),
    }
}

/// Round half away from zero; `f64::round` is not available in `core`.
fn round_to_i64(value: f64) -> i64 {
    if value >= 0.0 {
        (value + 0.5) as i64
    } else {
        (value - 0.5) as i64
    }
}

/// Converts a `PgnValue` into `f64` before a resolution is applied.
fn pgn_value_to_f64(value: &PgnValue) -> Result<f64, CodecError> {
    match value {
        PgnValue::F64(v) => Ok(*v),
        PgnValue::U32(v) => Ok(*v as f64),
        PgnValue::U16(v) => Ok(*v as f64),
        PgnValue::U8(v) => Ok(*v as f64),
        PgnValue::I16(v) => Ok(*v as f64),
        PgnValue::I8(v) => Ok(*v as f64),
        PgnValue::NotAvailable => Err(CodecError::DataTypeMismatch {
            value: *value,
            func: "pgn_value_to_f64",
        }),
    }
}

/// Converts an integer `PgnValue` into `i64` for unscaled number fields.
fn pgn_value_to_i64(value: &PgnValue) -> Result<i64, CodecError> {
    match value {
        PgnValue::U32(v) => Ok(*v as i64),
        PgnValue::U16(v) => Ok(*v as i64),
        PgnValue::U8(v) => Ok(*v as i64),
        PgnValue::I16(v) => Ok(*v as i64),
        PgnValue::I8(v) => Ok(*v as i64),
        _ => Err(CodecError::DataTypeMismatch {
            value: *value,
            func: "pgn_value_to_i64",
        }),
    }
}

/// Converts an unsigned `PgnValue` into `u64` for lookups and bit fields.
fn pgn_value_to_u64(value: &PgnValue) -> Result<u64, CodecError> {
    match value {
        PgnValue::U32(v) => Ok(*v as u64),
        PgnValue::U16(v) => Ok(*v as u64),
        PgnValue::U8(v) => Ok(*v as u64),
        _ => Err(CodecError::DataTypeMismatch {
            value: *value,
            func: "pgn_value_to_u64",
        }),
    }
}

/// Two's complement helper: extends the sign of a value read on `bits` bits.
fn sign_extend(value: u64, bits: u8) -> i64 {
    if bits >= 64 {
        return value as i64;
    }
    let sign_bit_mask = 1u64 << (bits - 1);
    if (value & sign_bit_mask) != 0 {
        (value | (u64::MAX << bits)) as i64
    } else {
        value as i64
    }
}

//==================================================================================TESTS
