use core::cell::Cell;

use embassy_time::Duration;

use crate::core::PgnDescriptor;
use crate::error::{ConfigError, SerializationError};
use crate::infra::clock::MonotonicClock;
use crate::infra::codec::traits::PgnData;
use crate::protocol::lookups::FluidType;
use crate::protocol::messages::Pgn127505;
use crate::telemetry::config::{ConfigPayload, ConfigValue};
use crate::telemetry::expiring_value::ExpiringValue;
use crate::telemetry::traits::{start_once, Configurable, Periodic, SenderState};

const TANK_INSTANCE_KEY: &str = "tank_instance";
const TANK_TYPE_KEY: &str = "tank_type";
const TANK_CAPACITY_KEY: &str = "tank_capacity";

const FLUID_LEVEL_CONFIG_SCHEMA: &str = r#"{
      "type": "object",
      "properties": {
        "tank_instance": { "title": "Tank instance", "type": "integer", "description": "Tank NMEA 2000 instance number (0-13)" },
        "tank_type": { "title": "Tank type", "type": "integer", "description": "Fluid type code (0-6, 14 error, 15 unavailable)" },
        "tank_capacity": { "title": "Tank capacity", "type": "number", "description": "Tank capacity (liters)" }
      }
    }"#;

/// Configured identity of a tank. Replaced as a whole on reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TankIdentity {
    /// 0 to 13.
    pub instance: u8,
    pub fluid_type: FluidType,
    /// Liters.
    pub capacity: f64,
}

/// Sender for PGN 127505, Fluid Level.
pub struct FluidLevelSender<K> {
    config_path: &'static str,
    clock: K,
    state: Cell<SenderState>,
    identity: Cell<TankIdentity>,
    tank_level: ExpiringValue<Option<f64>>,
}

impl<K: MonotonicClock> FluidLevelSender<K> {
    pub const REPEAT_INTERVAL: Duration = Duration::from_millis(2500);
    pub const EXPIRY: Duration = Duration::from_millis(10000);

    pub fn new(config_path: &'static str, identity: TankIdentity, clock: K) -> Self {
        Self {
            config_path,
            clock,
            state: Cell::new(SenderState::Constructed),
            identity: Cell::new(identity),
            tank_level: ExpiringValue::new(None, Self::EXPIRY),
        }
    }

    pub fn identity(&self) -> TankIdentity {
        self.identity.get()
    }

    /// Fill ratio, 0.0 (empty) to 1.0 (full); sent in percent.
    pub fn set_tank_level(&self, ratio: f64) {
        self.tank_level.update(Some(ratio * 100.0), self.clock.now());
    }

    pub fn message(&self) -> Pgn127505 {
        let identity = self.identity.get();
        Pgn127505 {
            instance: identity.instance,
            fluid_type: identity.fluid_type,
            level: self.tank_level.get(self.clock.now()),
            capacity: Some(identity.capacity),
        }
    }
}

impl<K: MonotonicClock> Periodic for FluidLevelSender<K> {
    fn descriptor(&self) -> &'static PgnDescriptor {
        Pgn127505::DESCRIPTOR
    }

    fn tick_interval(&self) -> Duration {
        Self::REPEAT_INTERVAL
    }

    fn state(&self) -> SenderState {
        self.state.get()
    }

    fn start(&self) {
        if start_once(&self.state) {
            #[cfg(feature = "defmt")]
            defmt::info!("Tank {} fluid level sender started", self.identity.get().instance);
        }
    }

    fn on_tick(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        self.message().to_payload(buffer)
    }
}

impl<K: MonotonicClock> Configurable for FluidLevelSender<K> {
    fn config_path(&self) -> &'static str {
        self.config_path
    }

    fn config_schema(&self) -> &'static str {
        FLUID_LEVEL_CONFIG_SCHEMA
    }

    fn to_payload(&self) -> Result<ConfigPayload, ConfigError> {
        let identity = self.identity.get();
        ConfigPayload::new()
            .with(TANK_INSTANCE_KEY, ConfigValue::Int(identity.instance as i64))?
            .with(
                TANK_TYPE_KEY,
                ConfigValue::Int(u8::from(identity.fluid_type) as i64),
            )?
            .with(TANK_CAPACITY_KEY, ConfigValue::Float(identity.capacity))
    }

    fn from_payload(&self, payload: &ConfigPayload) -> Result<(), ConfigError> {
        let instance = payload.require_int_in(TANK_INSTANCE_KEY, 0..=13)? as u8;
        let type_code = payload.require_int_in(TANK_TYPE_KEY, 0..=15)? as u8;
        let fluid_type = FluidType::try_from(type_code)
            .map_err(|_| ConfigError::OutOfRange { key: TANK_TYPE_KEY })?;
        let capacity = payload.require_float(TANK_CAPACITY_KEY)?;
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(ConfigError::OutOfRange {
                key: TANK_CAPACITY_KEY,
            });
        }

        self.identity.set(TankIdentity {
            instance,
            fluid_type,
            capacity,
        });
        Ok(())
    }
}
