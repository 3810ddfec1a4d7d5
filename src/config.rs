//! Playback configuration value types.
//!
//! Unit, pin and polarity are plain values: the host owns them, passes
//! them into a run by value, and nothing in the core mutates them
//! after that. No process-wide mutable state.

use serde::{Deserialize, Serialize};

/// Default base unit: one dot is 200 ms.
pub const DEFAULT_UNIT_MS: i64 = 200;

/// Default output pin (GPIO2, the usual board LED).
pub const DEFAULT_PIN: u8 = 2;

/// Timing configuration: the base unit in milliseconds.
///
/// All playback durations are integer multiples of this unit; see
/// [`crate::timing::Timing::derive`]. Read once at run start and held
/// for the whole run, so changing it mid-transmission only affects the
/// next run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Dot duration in milliseconds. Must be positive.
    pub unit_ms: i64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            unit_ms: DEFAULT_UNIT_MS,
        }
    }
}

impl TimingConfig {
    /// Config with the given unit.
    pub fn with_unit_ms(unit_ms: i64) -> Self {
        Self { unit_ms }
    }
}

/// Physical output channel configuration.
///
/// Read by the physical sink only; the sequencer itself deals in
/// activation booleans and never sees pin levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Output pin number on the device.
    pub pin: u8,

    /// Inverted polarity: active drives the pin low instead of high.
    /// Applied by the pin driver, not here.
    pub inverted: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            pin: DEFAULT_PIN,
            inverted: false,
        }
    }
}
