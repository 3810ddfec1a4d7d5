//! Host-facing composition: encoder + sequencer + configured sinks.
//!
//! Owns everything a device session needs to send a message. The host
//! builds the sinks once (visual, physical, telemetry), picks an
//! encoder, and calls [`MorseMachine::transmit`].

use std::sync::Arc;

use crate::config::TimingConfig;
use crate::encode::MorseEncoder;
use crate::error::SequenceError;
use crate::sequencer::PlaybackSequencer;
use crate::sink::ChannelSink;

/// A complete morse machine session.
pub struct MorseMachine<E> {
    encoder: E,
    sequencer: PlaybackSequencer,
    timing: TimingConfig,
    sinks: Vec<Arc<dyn ChannelSink>>,
}

impl<E: MorseEncoder> MorseMachine<E> {
    /// Build a machine. Pass sinks in the conventional order: visual,
    /// physical, telemetry.
    pub fn new(encoder: E, timing: TimingConfig, sinks: Vec<Arc<dyn ChannelSink>>) -> Self {
        Self {
            encoder,
            sequencer: PlaybackSequencer::new(),
            timing,
            sinks,
        }
    }

    /// Current timing configuration.
    pub fn timing(&self) -> TimingConfig {
        self.timing
    }

    /// Change the base unit. Applies to the next transmission; an
    /// in-flight one keeps the timing it started with.
    pub fn set_timing(&mut self, timing: TimingConfig) {
        self.timing = timing;
    }

    /// The underlying sequencer, for status queries and cancellation.
    pub fn sequencer(&self) -> &PlaybackSequencer {
        &self.sequencer
    }

    /// Encode `text` and play it.
    ///
    /// Leading/trailing whitespace is trimmed; an empty text is a
    /// no-op. Encoder failures surface as
    /// [`SequenceError::EncodeTransport`] before any token is
    /// processed.
    pub async fn transmit(&self, text: &str) -> Result<(), SequenceError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let encoded = self
            .encoder
            .encode(text)
            .await
            .map_err(SequenceError::EncodeTransport)?;

        self.sequencer
            .run(text, &encoded, self.timing, &self.sinks)
            .await
    }
}
