//! Digital inputs: tachometer pulse counting and alarm lines.
use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use embassy_time::{Duration, Instant};
use heapless::String;

use crate::error::ConfigError;
use crate::telemetry::config::{ConfigPayload, ConfigValue};
use crate::telemetry::rate_limiter::RateLimiter;
use crate::telemetry::traits::Configurable;

/// Revolutions per pulse when the pulse ratio is unknown (100 pulses per
/// revolution). Rarely correct; meant to be configured.
pub const DEFAULT_FREQUENCY_SCALE: f64 = 1.0 / 100.0;

/// Minimum spacing between two alarm line reports.
pub const ALARM_MIN_DELAY: Duration = Duration::from_millis(1000);

/// Number of alarm inputs on the board.
pub const ALARM_INPUT_COUNT: usize = 4;

//==================================================================================FREQUENCY
const MULTIPLIER_KEY: &str = "multiplier";

const FREQUENCY_CONFIG_SCHEMA: &str = r#"{
      "type": "object",
      "properties": {
        "multiplier": { "title": "Multiplier", "type": "number", "description": "Revolutions per input pulse" }
      }
    }"#;

/// Converts a pulse count over a counting window into revolutions per second.
pub struct Frequency {
    config_path: &'static str,
    multiplier: Cell<f64>,
}

impl Frequency {
    pub const fn new(config_path: &'static str, multiplier: f64) -> Self {
        Self {
            config_path,
            multiplier: Cell::new(multiplier),
        }
    }

    pub const fn tachometer(config_path: &'static str) -> Self {
        Self::new(config_path, DEFAULT_FREQUENCY_SCALE)
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier.get()
    }

    /// Hz for `counts` pulses seen during `interval`. An empty window reads 0.
    pub fn revolutions(&self, counts: u32, interval: Duration) -> f64 {
        let millis = interval.as_millis();
        if millis == 0 {
            return 0.0;
        }
        counts as f64 * 1000.0 / millis as f64 * self.multiplier.get()
    }
}

impl Configurable for Frequency {
    fn config_path(&self) -> &'static str {
        self.config_path
    }

    fn config_schema(&self) -> &'static str {
        FREQUENCY_CONFIG_SCHEMA
    }

    fn to_payload(&self) -> Result<ConfigPayload, ConfigError> {
        ConfigPayload::new().with(MULTIPLIER_KEY, ConfigValue::Float(self.multiplier.get()))
    }

    fn from_payload(&self, payload: &ConfigPayload) -> Result<(), ConfigError> {
        let multiplier = payload.require_float(MULTIPLIER_KEY)?;
        self.multiplier.set(multiplier);
        Ok(())
    }
}

//==================================================================================ALARMS
/// Alarm line debounced by a [`RateLimiter`].
#[derive(Debug, Clone)]
pub struct AlarmInput {
    limiter: RateLimiter,
}

impl AlarmInput {
    pub const fn new() -> Self {
        Self {
            limiter: RateLimiter::new(ALARM_MIN_DELAY),
        }
    }

    /// Line state to report, if any.
    pub fn on_input(&mut self, active: bool, now: Instant) -> Option<bool> {
        self.limiter.on_input(active, now)
    }
}

impl Default for AlarmInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest state of every alarm input, shared between the input handlers and
/// the display.
pub struct AlarmStates<M: RawMutex> {
    states: Mutex<M, Cell<[bool; ALARM_INPUT_COUNT]>>,
}

impl<M: RawMutex> AlarmStates<M> {
    pub const fn new() -> Self {
        Self {
            states: Mutex::new(Cell::new([false; ALARM_INPUT_COUNT])),
        }
    }

    /// Record the state of input `index`. Returns `false` for an unknown input.
    pub fn set(&self, index: usize, active: bool) -> bool {
        self.states.lock(|cell| {
            let mut states = cell.get();
            match states.get_mut(index) {
                Some(state) => {
                    *state = active;
                    cell.set(states);
                    true
                }
                None => false,
            }
        })
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.snapshot().get(index).copied()
    }

    pub fn snapshot(&self) -> [bool; ALARM_INPUT_COUNT] {
        self.states.lock(Cell::get)
    }

    /// One character per input, `*` when active and `_` otherwise.
    pub fn indicator_text(&self) -> String<ALARM_INPUT_COUNT> {
        self.snapshot()
            .iter()
            .map(|&active| if active { '*' } else { '_' })
            .collect()
    }
}

impl<M: RawMutex> Default for AlarmStates<M> {
    fn default() -> Self {
        Self::new()
    }
}
