//! PGN senders: one per engine or tank, created at boot and never destroyed.
//!
//! Consumers push readings through the `set_*` entry points whenever a sensor
//! produces one; the scheduler calls [`Periodic::on_tick`](super::traits::Periodic::on_tick)
//! at the PGN cadence. Units are converted at the entry points so trackers
//! hold protocol units (rpm, percent).
mod engine_dynamic;
mod engine_rapid;
mod fluid_level;

pub use engine_dynamic::EngineDynamicSender;
pub use engine_rapid::EngineRapidSender;
pub use fluid_level::{FluidLevelSender, TankIdentity};

use crate::error::ConfigError;
use crate::telemetry::config::{ConfigPayload, ConfigValue};

const ENGINE_INSTANCE_KEY: &str = "engine_instance";

/// Schema shared by both engine senders.
const ENGINE_CONFIG_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
      "engine_instance": { "title": "Engine instance", "type": "integer", "description": "Engine NMEA 2000 instance number (0-253)" }
    }
  }"#;

fn engine_instance_payload(instance: u8) -> Result<ConfigPayload, ConfigError> {
    ConfigPayload::new().with(ENGINE_INSTANCE_KEY, ConfigValue::Int(instance as i64))
}

fn engine_instance_from(payload: &ConfigPayload) -> Result<u8, ConfigError> {
    Ok(payload.require_int_in(ENGINE_INSTANCE_KEY, 0..=253)? as u8)
}
