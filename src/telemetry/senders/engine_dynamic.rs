use core::cell::Cell;

use embassy_time::{Duration, Instant};

use crate::core::PgnDescriptor;
use crate::error::{ConfigError, SerializationError};
use crate::infra::clock::MonotonicClock;
use crate::infra::codec::traits::PgnData;
use crate::protocol::lookups::{EngineStatus1, EngineStatus2};
use crate::protocol::messages::Pgn127489;
use crate::telemetry::config::ConfigPayload;
use crate::telemetry::expiring_value::ExpiringValue;
use crate::telemetry::traits::{start_once, Configurable, Periodic, SenderState};

use super::{engine_instance_from, engine_instance_payload, ENGINE_CONFIG_SCHEMA};

/// Status 1 flags that raise "check engine" (everything but the charge and
/// preheat indicators).
const CHECK_ENGINE_STATUS1: u16 = !(EngineStatus1::CheckEngine.mask()
    | EngineStatus1::ChargeIndicator.mask()
    | EngineStatus1::PreheatIndicator.mask());

/// Status 2 flags that raise "check engine".
const CHECK_ENGINE_STATUS2: u16 = EngineStatus2::WarningLevel1.mask()
    | EngineStatus2::WarningLevel2.mask()
    | EngineStatus2::EngineCommError.mask();

/// Expands the field table into the tracker set and the consumer entry points.
///
/// Numeric trackers are named after the `Pgn127489` field they fill; status
/// trackers carry the bit they drive.
macro_rules! dynamic_fields {
    (
        numeric { $( $num:ident : $ty:ty => $num_setter:ident, $unit:literal; )* }
        status1 { $( $s1:ident => $s1_setter:ident : $s1_bit:ident; )* }
        status2 { $( $s2:ident => $s2_setter:ident : $s2_bit:ident; )* }
    ) => {
        struct DynamicTrackers {
            $( $num: ExpiringValue<Option<$ty>>, )*
            $( $s1: ExpiringValue<bool>, )*
            $( $s2: ExpiringValue<bool>, )*
        }

        impl DynamicTrackers {
            const fn new(expiry: Duration) -> Self {
                Self {
                    $( $num: ExpiringValue::new(None, expiry), )*
                    $( $s1: ExpiringValue::new(false, expiry), )*
                    $( $s2: ExpiringValue::new(false, expiry), )*
                }
            }

            fn fill(&self, msg: &mut Pgn127489, now: Instant) {
                $( msg.$num = self.$num.get(now); )*
            }

            fn status1(&self, now: Instant) -> u16 {
                let mut word = 0;
                $( if self.$s1.get(now) { word |= EngineStatus1::$s1_bit.mask(); } )*
                word
            }

            fn status2(&self, now: Instant) -> u16 {
                let mut word = 0;
                $( if self.$s2.get(now) { word |= EngineStatus2::$s2_bit.mask(); } )*
                word
            }
        }

        impl<K: MonotonicClock> EngineDynamicSender<K> {
            $(
                #[doc = concat!("Unit: ", $unit, ".")]
                pub fn $num_setter(&self, value: $ty) {
                    self.trackers.$num.update(Some(value), self.clock.now());
                }
            )*
            $(
                pub fn $s1_setter(&self, active: bool) {
                    self.trackers.$s1.update(active, self.clock.now());
                }
            )*
            $(
                pub fn $s2_setter(&self, active: bool) {
                    self.trackers.$s2.update(active, self.clock.now());
                }
            )*
        }
    };
}

dynamic_fields! {
    numeric {
        oil_pressure: f64 => set_oil_pressure, "Pa";
        oil_temperature: f64 => set_oil_temperature, "K";
        temperature: f64 => set_temperature, "K";
        alternator_potential: f64 => set_alternator_potential, "V";
        fuel_rate: f64 => set_fuel_rate, "L/h";
        total_engine_hours: u32 => set_total_engine_hours, "s";
        coolant_pressure: f64 => set_coolant_pressure, "Pa";
        fuel_pressure: f64 => set_fuel_pressure, "Pa";
        engine_load: i8 => set_engine_load, "%";
        engine_torque: i8 => set_engine_torque, "%";
    }
    status1 {
        over_temperature => set_over_temperature : OverTemperature;
        low_oil_pressure => set_low_oil_pressure : LowOilPressure;
        low_oil_level => set_low_oil_level : LowOilLevel;
        low_fuel_pressure => set_low_fuel_pressure : LowFuelPressure;
        low_system_voltage => set_low_system_voltage : LowSystemVoltage;
        low_coolant_level => set_low_coolant_level : LowCoolantLevel;
        water_flow => set_water_flow : WaterFlow;
        water_in_fuel => set_water_in_fuel : WaterInFuel;
        charge_indicator => set_charge_indicator : ChargeIndicator;
        preheat_indicator => set_preheat_indicator : PreheatIndicator;
        high_boost_pressure => set_high_boost_pressure : HighBoostPressure;
        rev_limit_exceeded => set_rev_limit_exceeded : RevLimitExceeded;
        egr_system => set_egr_system : EgrSystem;
        throttle_position_sensor => set_throttle_position_sensor : ThrottlePositionSensor;
        emergency_stop => set_emergency_stop : EmergencyStop;
    }
    status2 {
        warning_level_1 => set_warning_level_1 : WarningLevel1;
        warning_level_2 => set_warning_level_2 : WarningLevel2;
        power_reduction => set_power_reduction : PowerReduction;
        maintenance_needed => set_maintenance_needed : MaintenanceNeeded;
        engine_comm_error => set_engine_comm_error : EngineCommError;
        sub_or_secondary_throttle => set_sub_or_secondary_throttle : SubOrSecondaryThrottle;
        neutral_start_protect => set_neutral_start_protect : NeutralStartProtect;
        engine_shutting_down => set_engine_shutting_down : EngineShuttingDown;
    }
}

/// Sender for PGN 127489, Engine Parameters Dynamic.
///
/// "Check engine" has no entry point: it is derived from the other flags
/// every time a message is assembled.
pub struct EngineDynamicSender<K> {
    config_path: &'static str,
    clock: K,
    state: Cell<SenderState>,
    engine_instance: Cell<u8>,
    trackers: DynamicTrackers,
}

impl<K: MonotonicClock> EngineDynamicSender<K> {
    pub const REPEAT_INTERVAL: Duration = Duration::from_millis(500);
    pub const EXPIRY: Duration = Duration::from_millis(5000);

    pub fn new(config_path: &'static str, engine_instance: u8, clock: K) -> Self {
        Self {
            config_path,
            clock,
            state: Cell::new(SenderState::Constructed),
            engine_instance: Cell::new(engine_instance),
            trackers: DynamicTrackers::new(Self::EXPIRY),
        }
    }

    pub fn engine_instance(&self) -> u8 {
        self.engine_instance.get()
    }

    /// Both discrete status words as they would be sent now.
    pub fn status_words(&self) -> (u16, u16) {
        self.status_words_at(self.clock.now())
    }

    fn status_words_at(&self, now: Instant) -> (u16, u16) {
        let mut status1 = self.trackers.status1(now);
        let status2 = self.trackers.status2(now);
        if status1 & CHECK_ENGINE_STATUS1 != 0 || status2 & CHECK_ENGINE_STATUS2 != 0 {
            status1 |= EngineStatus1::CheckEngine.mask();
        }
        (status1, status2)
    }

    pub fn message(&self) -> Pgn127489 {
        let mut msg = Pgn127489::new(self.engine_instance.get());
        let now = self.clock.now();
        self.trackers.fill(&mut msg, now);
        (msg.discrete_status1, msg.discrete_status2) = self.status_words_at(now);
        msg
    }
}

impl<K: MonotonicClock> Periodic for EngineDynamicSender<K> {
    fn descriptor(&self) -> &'static PgnDescriptor {
        Pgn127489::DESCRIPTOR
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
            defmt::info!("Engine {} dynamic sender started", self.engine_instance.get());
        }
    }

    fn on_tick(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        self.message().to_payload(buffer)
    }
}

impl<K: MonotonicClock> Configurable for EngineDynamicSender<K> {
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
