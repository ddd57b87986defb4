//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (configuration payloads,
//! calibration curves, CAN ID construction, serialization/deserialization).
use crate::core::PgnValue;
use thiserror_no_std::Error;

//==================================================================================CONFIG_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Rejection of a reconfiguration payload. The previous configuration is
/// always retained when one of these is returned.
pub enum ConfigError {
    /// A required key is absent from the payload.
    #[error("Missing configuration key {key}")]
    MissingKey { key: &'static str },
    /// The key is present but holds a value of the wrong type.
    #[error("Invalid value for configuration key {key}")]
    InvalidValue { key: &'static str },
    /// The value is outside the range accepted by the protocol.
    #[error("Value out of range for configuration key {key}")]
    OutOfRange { key: &'static str },
    /// The payload has no room left for another key.
    #[error("Configuration payload is full")]
    PayloadFull,
}

//==================================================================================CURVE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Rejection of a calibration curve. The interpolator keeps its previous samples.
pub enum CurveError {
    /// A curve needs at least one sample.
    #[error("Curve has no samples")]
    Empty,
    /// Two samples share the same input value.
    #[error("Duplicate sample input")]
    DuplicateInput,
    /// Samples are not sorted by increasing input.
    #[error("Samples are not sorted by input")]
    Unsorted,
    /// Input or output is NaN.
    #[error("Sample holds a NaN value")]
    NotANumber,
    /// More samples than the interpolator can hold.
    #[error("Too many samples")]
    CapacityExceeded,
}

//==================================================================================CAN_ID_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors that can occur while building a 29-bit CAN identifier.
pub enum CanIdBuildError {
    /// The PGN does not fit in 18 bits.
    #[error("Invalid PGN")]
    InvalidPgn,
    /// Attempt to broadcast (PDU2) a PGN whose PF is < 240.
    #[error("Invalid for broadcast message: PF is too low")]
    InvalidForBroadcast,
    /// Payload exceeds the Fast Packet capacity.
    #[error("Payload too large: {len} bytes")]
    PayloadTooLarge { len: usize },
}

//================================================================================CODEC_ERROR

#[derive(Debug, Error)]
/// Issues encountered while serializing a PGN into a buffer.
pub enum SerializationError {
    /// Provided buffer is too small for the payload.
    #[error("Buffer too small")]
    BufferTooSmall,
    /// Failed while writing bits into the output buffer.
    #[error("BitWrite error: {err}")]
    BitWriteError { err: BitWriterError },
    /// Expected field was missing from the message structure.
    #[error("Field {field_id} not found")]
    FieldNotFound { field_id: &'static str },
    /// Lookup or bit field value does not fit in the field width.
    #[error("Value too wide for field {field_id}")]
    ValueTooWide { field_id: &'static str },
    /// Value cannot be represented by the field.
    #[error("Codec Error: {source}")]
    CodecError { source: CodecError },
}

#[derive(Error, Debug)]
/// Errors raised while deserializing a CAN buffer into a PGN structure.
pub enum DeserializationError {
    /// Payload size does not match the expected layout.
    #[error("Invalid data length")]
    InvalidDataLength,
    /// Could not assign value into the target structure.
    #[error("Field assignment failed {desc}")]
    FieldAssignmentFailed { desc: &'static str },
    /// Bit-level access on the buffer failed.
    #[error("BitReader error: {err}")]
    BitReaderError { err: BitReaderError },
}

#[derive(Error, Debug)]
/// Shared error abstraction for conversion helpers.
pub enum CodecError {
    /// Value type is incompatible with the field descriptor.
    #[error("Data type mismatch for value {value:?}, function: {func}")]
    DataTypeMismatch { value: PgnValue, func: &'static str },
}

//==================================================================================SEND_ERROR
#[derive(Debug, Error)]
/// Errors encountered when sending a PGN (build + transmit).
pub enum SendPgnError<E: core::fmt::Debug> {
    /// PGN serialization failed.
    #[error("Serialization failed")]
    Serialization,
    /// CAN identifier or frame sequence could not be built.
    #[error("Frame build failed: {0:?}")]
    Build(CanIdBuildError),
    /// CAN layer refused or failed to send the frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}

//==================================================================================BITREADER_ERRORS
#[derive(Debug, Error)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than a `u64` can hold.
    #[error("Cannot read more than 64 bits. Requested: {asked}")]
    TooLongForType { asked: u8 },
}
//==================================================================================BITWRITER_ERRORS
#[derive(Debug, Error)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than a `u64` can hold.
    #[error("Cannot write more than 64 bits. Requested: {asked}")]
    TooLongForType { asked: u8 },
}
