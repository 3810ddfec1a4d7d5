//! # RustMorseMachine
//!
//! Morse playback engine driving a lamp, a remote GPIO pin and a
//! telemetry channel from one timed sequence.
//!
//! ## Architecture
//!
//! The [`PlaybackSequencer`] is the single producer of playback events.
//! Components are isolated:
//! - The sequencer fans events out through per-sink queues and never
//!   waits on a sink; timing comes from the clock alone
//! - Sinks consume their queue in order, don't know about each other,
//!   and may fail without touching the sequence
//! - One transmission at a time, enforced by state, not by a lock
//!
//! ```text
//! text ──▶ MorseEncoder ──▶ ". -- .  ..." ──▶ PlaybackSequencer
//!                                                │ (timed loop)
//!                                   ┌────────────┼────────────┐
//!                                   ▼            ▼            ▼
//!                               VisualSink  PhysicalSink  TelemetrySink
//!                               (lamp)      (GPIO/HTTP)   (serial log)
//! ```

pub mod config;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod machine;
pub mod sequencer;
pub mod sink;
pub mod timing;
pub mod token;

pub use config::{ChannelConfig, TimingConfig};
pub use encode::{HttpEncoder, MorseEncoder, TableEncoder};
pub use error::{EncodeError, SequenceError, SinkError};
pub use machine::MorseMachine;
pub use sequencer::PlaybackSequencer;
pub use sink::{ChannelSink, PhysicalSink, TelemetrySink, VisualSink};
pub use timing::Timing;
pub use token::{tokenize, GapKind, MarkKind, Token};
