//! High-level components of the NMEA 2000 protocol: lookup tables,
//! message structures, and CAN/Fast Packet transport.
pub mod lookups;
pub mod messages;
pub mod transport;
