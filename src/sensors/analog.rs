//! ADC voltage conditioning for the analog inputs: tank sender resistance,
//! calibrated voltage readings and the linear tank volume transform.
use core::cell::Cell;

use embassy_time::Duration;

use crate::error::{ConfigError, CurveError};
use crate::sensors::curve::{CurveInterpolator, Sample};
use crate::telemetry::config::{ConfigPayload, ConfigValue};
use crate::telemetry::traits::Configurable;

/// Input voltage divider of the analog inputs.
pub const VOLTAGE_DIVIDER_SCALE: f64 = 33.3 / 3.3;

/// Constant current driven through a resistive sender (A).
pub const MEASUREMENT_CURRENT: f64 = 0.01;

/// Default tank size (m3).
pub const DEFAULT_TANK_SIZE: f64 = 120.0 / 1000.0;

/// Resistance of a sender fed with [`MEASUREMENT_CURRENT`], from the voltage
/// measured at the ADC (ohm).
pub fn sender_resistance(adc_volts: f64) -> f64 {
    VOLTAGE_DIVIDER_SCALE * adc_volts / MEASUREMENT_CURRENT
}

//==================================================================================VOLTAGE_INPUT
const READ_INTERVAL_KEY: &str = "read_interval";
const CALIBRATION_FACTOR_KEY: &str = "calibration_factor";

const VOLTAGE_INPUT_CONFIG_SCHEMA: &str = r#"{
      "type": "object",
      "properties": {
        "read_interval": { "title": "Read interval", "type": "number", "description": "Number of milliseconds between each reading" },
        "calibration_factor": { "title": "Calibration factor", "type": "number", "description": "Scale factor to fix the input calibration" }
      }
    }"#;

/// Voltage seen at an analog input terminal, corrected by a per-input
/// calibration factor.
pub struct VoltageInput {
    config_path: &'static str,
    read_interval: Cell<Duration>,
    calibration_factor: Cell<f64>,
}

impl VoltageInput {
    pub const DEFAULT_READ_INTERVAL: Duration = Duration::from_millis(1000);

    pub const fn new(config_path: &'static str) -> Self {
        Self {
            config_path,
            read_interval: Cell::new(Self::DEFAULT_READ_INTERVAL),
            calibration_factor: Cell::new(1.0),
        }
    }

    pub fn with_calibration_factor(self, factor: f64) -> Self {
        self.calibration_factor.set(factor);
        self
    }

    /// Time between two ADC reads.
    pub fn read_interval(&self) -> Duration {
        self.read_interval.get()
    }

    pub fn calibration_factor(&self) -> f64 {
        self.calibration_factor.get()
    }

    /// Terminal voltage for a voltage read at the ADC.
    pub fn scale(&self, adc_volts: f64) -> f64 {
        self.calibration_factor.get() * VOLTAGE_DIVIDER_SCALE * adc_volts
    }
}

impl Configurable for VoltageInput {
    fn config_path(&self) -> &'static str {
        self.config_path
    }

    fn config_schema(&self) -> &'static str {
        VOLTAGE_INPUT_CONFIG_SCHEMA
    }

    fn to_payload(&self) -> Result<ConfigPayload, ConfigError> {
        ConfigPayload::new()
            .with(
                READ_INTERVAL_KEY,
                ConfigValue::Int(self.read_interval.get().as_millis() as i64),
            )?
            .with(
                CALIBRATION_FACTOR_KEY,
                ConfigValue::Float(self.calibration_factor.get()),
            )
    }

    /// `read_interval` is required, `calibration_factor` keeps its value when
    /// absent.
    fn from_payload(&self, payload: &ConfigPayload) -> Result<(), ConfigError> {
        let interval_ms = payload.require_int_in(READ_INTERVAL_KEY, 1..=i64::from(u32::MAX))?;
        let factor = payload.optional_float(CALIBRATION_FACTOR_KEY)?;

        self.read_interval
            .set(Duration::from_millis(interval_ms as u64));
        if let Some(factor) = factor {
            self.calibration_factor.set(factor);
        }
        Ok(())
    }
}

//==================================================================================LINEAR
const MULTIPLIER_KEY: &str = "multiplier";
const OFFSET_KEY: &str = "offset";

const LINEAR_CONFIG_SCHEMA: &str = r#"{
      "type": "object",
      "properties": {
        "multiplier": { "title": "Multiplier", "type": "number" },
        "offset": { "title": "Constant offset", "type": "number" }
      }
    }"#;

/// `y = multiplier * x + offset`. With a fill ratio as input and the tank
/// size as multiplier, yields the remaining volume.
pub struct Linear {
    config_path: &'static str,
    multiplier: Cell<f64>,
    offset: Cell<f64>,
}

impl Linear {
    pub const fn new(config_path: &'static str, multiplier: f64, offset: f64) -> Self {
        Self {
            config_path,
            multiplier: Cell::new(multiplier),
            offset: Cell::new(offset),
        }
    }

    /// Tank volume transform with [`DEFAULT_TANK_SIZE`].
    pub const fn tank_volume(config_path: &'static str) -> Self {
        Self::new(config_path, DEFAULT_TANK_SIZE, 0.0)
    }

    pub fn apply(&self, input: f64) -> f64 {
        self.multiplier.get() * input + self.offset.get()
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier.get()
    }

    pub fn offset(&self) -> f64 {
        self.offset.get()
    }
}

impl Configurable for Linear {
    fn config_path(&self) -> &'static str {
        self.config_path
    }

    fn config_schema(&self) -> &'static str {
        LINEAR_CONFIG_SCHEMA
    }

    fn to_payload(&self) -> Result<ConfigPayload, ConfigError> {
        ConfigPayload::new()
            .with(MULTIPLIER_KEY, ConfigValue::Float(self.multiplier.get()))?
            .with(OFFSET_KEY, ConfigValue::Float(self.offset.get()))
    }

    fn from_payload(&self, payload: &ConfigPayload) -> Result<(), ConfigError> {
        let multiplier = payload.require_float(MULTIPLIER_KEY)?;
        let offset = payload.require_float(OFFSET_KEY)?;
        self.multiplier.set(multiplier);
        self.offset.set(offset);
        Ok(())
    }
}

//==================================================================================TANK_SENDER
/// One conditioned tank reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TankReading {
    /// Sender resistance (ohm).
    pub resistance: f64,
    /// Fill ratio, 0.0 to 1.0.
    pub level: f64,
    /// Remaining volume (m3).
    pub volume: f64,
}

/// Resistive tank sender chain: ADC voltage to resistance, resistance to
/// fill ratio through a calibration curve, ratio to volume.
pub struct TankSender {
    curve: CurveInterpolator,
    volume: Linear,
}

impl TankSender {
    /// Chain using the persisted curve if any, `default_curve` otherwise.
    pub fn new(
        persisted: Option<&[Sample]>,
        default_curve: &[Sample],
        volume: Linear,
    ) -> Result<Self, CurveError> {
        let curve = CurveInterpolator::load(persisted, default_curve)?
            .with_titles("Sender Resistance (ohms)", "Fuel Level (ratio)");
        Ok(Self { curve, volume })
    }

    pub fn curve(&self) -> &CurveInterpolator {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut CurveInterpolator {
        &mut self.curve
    }

    pub fn volume(&self) -> &Linear {
        &self.volume
    }

    pub fn read(&self, adc_volts: f64) -> TankReading {
        let resistance = sender_resistance(adc_volts);
        let level = self.curve.interpolate(resistance);
        TankReading {
            resistance,
            level,
            volume: self.volume.apply(level),
        }
    }
}
