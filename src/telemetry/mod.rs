//! Engine and tank telemetry published as periodic NMEA 2000 PGNs.
//!
//! Sensor readings reach the senders whenever they arrive; each sender keeps
//! the last value of every field in an [`ExpiringValue`](expiring_value::ExpiringValue)
//! and the [`TelemetryScheduler`](scheduler::TelemetryScheduler) asks it for a
//! fresh payload at the cadence mandated by the standard. Stale fields go out
//! as "not available".
pub mod config;
pub mod expiring_value;
pub mod rate_limiter;
pub mod scheduler;
pub mod senders;
pub mod traits;
