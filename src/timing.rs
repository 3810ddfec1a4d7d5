//! Timing model: one base unit, four derived durations.
//!
//! Standard Morse proportions: a dash is three units, the gap between
//! letters three units, the gap between words seven units. The one-unit
//! gap between marks of the same letter is not stored here; the
//! sequencer always inserts it as `dot` after a mark.

use std::time::Duration;

use crate::config::TimingConfig;
use crate::error::SequenceError;
use crate::token::MarkKind;

/// Durations derived from one base unit.
///
/// Derived once per run (see [`Timing::derive`]) and held for the whole
/// run; never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Dot duration: one unit.
    pub dot: Duration,

    /// Dash duration: three units.
    pub dash: Duration,

    /// Gap between letters: three units.
    pub letter_gap: Duration,

    /// Gap between words: seven units.
    pub word_gap: Duration,
}

impl Timing {
    /// Derive all playback durations from the configured base unit.
    ///
    /// Fails with [`SequenceError::InvalidUnit`] when the unit is zero
    /// or negative. No side effects; called at most once per run.
    pub fn derive(config: TimingConfig) -> Result<Self, SequenceError> {
        let unit_ms = config.unit_ms;
        if unit_ms <= 0 {
            return Err(SequenceError::InvalidUnit { unit_ms });
        }

        let unit = Duration::from_millis(unit_ms as u64);
        Ok(Self {
            dot: unit,
            dash: unit * 3,
            letter_gap: unit * 3,
            word_gap: unit * 7,
        })
    }

    /// Active duration for a mark.
    #[inline]
    pub fn for_mark(&self, kind: MarkKind) -> Duration {
        match kind {
            MarkKind::Dot => self.dot,
            MarkKind::Dash => self.dash,
        }
    }
}
