//! Seams between the senders, the scheduler and the configuration store.
use core::cell::Cell;

use embassy_time::Duration;

use crate::core::PgnDescriptor;
use crate::error::{ConfigError, SerializationError};
use crate::telemetry::config::ConfigPayload;

//==================================================================================SENDER_STATE
/// Lifecycle of a sender. There is no stopped state: senders live as long as
/// the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SenderState {
    Constructed,
    Running,
}

/// Moves `state` to `Running`. Returns `false` if it already was.
pub(crate) fn start_once(state: &Cell<SenderState>) -> bool {
    if state.get() == SenderState::Running {
        return false;
    }
    state.set(SenderState::Running);
    true
}

//==================================================================================PERIODIC
/// A source of one PGN emitted at a fixed cadence.
///
/// Object safe: the scheduler holds `&dyn Periodic`.
pub trait Periodic {
    /// Layout of the emitted PGN.
    fn descriptor(&self) -> &'static PgnDescriptor;

    /// Time between two emissions.
    fn tick_interval(&self) -> Duration;

    fn state(&self) -> SenderState;

    /// Enter the `Running` state. Calling it twice has no effect.
    fn start(&self);

    /// Serialize the current message into `buffer` and return its length.
    /// Stale fields are written as "not available".
    fn on_tick(&self, buffer: &mut [u8]) -> Result<usize, SerializationError>;

    fn pgn(&self) -> u32 {
        self.descriptor().id
    }

    fn priority(&self) -> u8 {
        self.descriptor().priority
    }

    fn fast_packet(&self) -> bool {
        self.descriptor().fastpacket
    }
}

//==================================================================================CONFIGURABLE
/// Object whose identity settings are persisted and edited externally.
pub trait Configurable {
    /// Key under which the configuration is stored.
    fn config_path(&self) -> &'static str;

    /// JSON schema describing the payload, for the configuration UI.
    fn config_schema(&self) -> &'static str;

    /// Current configuration.
    fn to_payload(&self) -> Result<ConfigPayload, ConfigError>;

    /// Apply a configuration. Every key is validated before anything is
    /// changed: on error the previous configuration is kept as a whole.
    fn from_payload(&self, payload: &ConfigPayload) -> Result<(), ConfigError>;
}
