//! Public traits exposed by the codec engine. They decouple the PGN message
//! structures from the serialization/deserialization logic and provide a
//! uniform API to the senders and the transport.
use crate::core::{PgnDescriptor, PgnValue};
use crate::error::{DeserializationError, SerializationError};

use super::engine::{deserialize_into, serialize};

//==================================================================================PGN_DATA
/// Implemented by every PGN message struct.
/// Acts as a bridge between the static descriptor and the interpretation engine.
pub trait PgnData: Sized + Default + FieldAccess {
    /// Static layout of the message.
    const DESCRIPTOR: &'static PgnDescriptor;

    /// Deserialize a payload into an instance of the struct.
    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        let mut instance = Self::default();
        deserialize_into(&mut instance, payload, Self::DESCRIPTOR)?;
        Ok(instance)
    }

    /// Serialize the instance into the provided buffer and return the
    /// number of bytes written.
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        serialize(self, buffer, Self::DESCRIPTOR)
    }
}
//==================================================================================FIELD_ACCESS
/// Lets the engine access message fields by their `'static str` identifier
/// without knowing the concrete type.
///
/// ```rust, ignore
/// let mut msg = Pgn127488::default();
/// msg.field_mut("speed", PgnValue::F64(1500.0));
/// assert_eq!(msg.field("speed"), Some(PgnValue::F64(1500.0)));
/// ```
pub trait FieldAccess {
    /// Read the value of a field.
    ///
    /// Returns `Some(PgnValue)` if the field exists, `None` otherwise.
    /// Fields holding no data return `Some(PgnValue::NotAvailable)`.
    fn field(&self, id: &'static str) -> Option<PgnValue>;

    /// Write the value of a field.
    ///
    /// Returns `Some(())` on success, `None` if the field does not exist or the
    /// type mismatches.
    fn field_mut(&mut self, id: &'static str, value: PgnValue) -> Option<()>;
}
