use core::cell::Cell;

use embassy_time::Duration;

use crate::core::PgnDescriptor;
use crate::error::{ConfigError, SerializationError};
use crate::infra::clock::MonotonicClock;
use crate::infra::codec::traits::PgnData;
use crate::protocol::messages::Pgn127488;
use crate::telemetry::config::ConfigPayload;
use crate::telemetry::expiring_value::ExpiringValue;
use crate::telemetry::traits::{start_once, Configurable, Periodic, SenderState};

use super::{engine_instance_from, engine_instance_payload, ENGINE_CONFIG_SCHEMA};

/// Sender for PGN 127488, Engine Parameters Rapid Update.
pub struct EngineRapidSender<K> {
    config_path: &'static str,
    clock: K,
    state: Cell<SenderState>,
    engine_instance: Cell<u8>,
    engine_speed: ExpiringValue<Option<f64>>,
    boost_pressure: ExpiringValue<Option<f64>>,
    tilt_trim: ExpiringValue<Option<i8>>,
}

impl<K: MonotonicClock> EngineRapidSender<K> {
    /// Emission interval dictated by NMEA 2000.
    pub const REPEAT_INTERVAL: Duration = Duration::from_millis(100);
    /// Inputs older than this are sent as "not available".
    pub const EXPIRY: Duration = Duration::from_millis(1000);

    pub fn new(config_path: &'static str, engine_instance: u8, clock: K) -> Self {
        Self {
            config_path,
            clock,
            state: Cell::new(SenderState::Constructed),
            engine_instance: Cell::new(engine_instance),
            engine_speed: ExpiringValue::new(None, Self::EXPIRY),
            boost_pressure: ExpiringValue::new(None, Self::EXPIRY),
            tilt_trim: ExpiringValue::new(None, Self::EXPIRY),
        }
    }

    pub fn engine_instance(&self) -> u8 {
        self.engine_instance.get()
    }

    /// Engine speed in Hz (revolutions per second); sent in rpm.
    pub fn set_engine_speed(&self, hz: f64) {
        self.engine_speed.update(Some(hz * 60.0), self.clock.now());
    }

    /// Boost pressure in Pa.
    pub fn set_boost_pressure(&self, pa: f64) {
        self.boost_pressure.update(Some(pa), self.clock.now());
    }

    /// Drive tilt/trim in percent.
    pub fn set_tilt_trim(&self, percent: i8) {
        self.tilt_trim.update(Some(percent), self.clock.now());
    }

    /// Message as it would be sent now.
    pub fn message(&self) -> Pgn127488 {
        let now = self.clock.now();
        Pgn127488 {
            instance: self.engine_instance.get(),
            speed: self.engine_speed.get(now),
            boost_pressure: self.boost_pressure.get(now),
            tilt_trim: self.tilt_trim.get(now),
        }
    }
}

impl<K: MonotonicClock> Periodic for EngineRapidSender<K> {
    fn descriptor(&self) -> &'static PgnDescriptor {
        Pgn127488::DESCRIPTOR
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
            defmt::info!("Engine {} rapid update sender started", self.engine_instance.get());
        }
    }

    fn on_tick(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        self.message().to_payload(buffer)
    }
}

impl<K: MonotonicClock> Configurable for EngineRapidSender<K> {
    fn config_path(&self) -> &'static str {
        self.config_path
    }

    fn config_schema(&self) -> &'static str {
        ENGINE_CONFIG_SCHEMA
    }

    fn to_payload(&self) -> Result<ConfigPayload, ConfigError> {
        engine_instance_payload(self.engine_instance.get())
    }

    fn from_payload(&self, payload: &ConfigPayload) -> Result<(), ConfigError> {
        let instance = engine_instance_from(payload)?;
        self.engine_instance.set(instance);
        Ok(())
    }
}
