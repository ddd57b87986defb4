//! `halmet-n2k` library: engine and tank telemetry for marine monitoring
//! boards, published as NMEA 2000 PGNs from a `no_std` environment. The crate
//! exposes the infrastructure modules (codec, clock), the protocol layer
//! (messages, CAN transport, Fast Packet), the telemetry senders with their
//! periodic scheduler, and the sensor conditioning helpers.
#![no_std]
//==================================================================================
/// Core data types shared by the message descriptors and the codec engine.
pub mod core;
/// Domain and low-level errors (configuration, calibration curves, CAN
/// identifier construction, serialization, deserialization).
pub mod error;
/// Codec engine and monotonic clock abstraction.
pub mod infra;
/// NMEA 2000 protocol implementation: lookups, PGN messages, CAN transport
/// and Fast Packet segmentation.
pub mod protocol;
/// Sensor conditioning: calibration curves, analog and digital inputs.
pub mod sensors;
/// Freshness tracking, rate limiting, PGN senders and their scheduler.
pub mod telemetry;
//==================================================================================
