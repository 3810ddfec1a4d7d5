//! Error taxonomy for the playback engine.
//!
//! Three tiers with different propagation rules:
//!
//! - [`SequenceError`]: surfaced to the caller of `run()`. Every variant
//!   aborts before any channel activation (or, for `Cancelled`, after
//!   forcing deactivation).
//! - [`EncodeError`]: encoder collaborator failures, wrapped into
//!   `SequenceError::EncodeTransport` at the composition layer.
//! - [`SinkError`]: per-call delivery failures. Fully contained by the
//!   dispatch layer; recorded and logged, never propagated into the
//!   sequencer's control flow or timing.

use thiserror::Error;

/// Errors surfaced to the caller of a playback run.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// A run was requested while another is in flight. Never queued,
    /// never silently dropped.
    #[error("transmission already in progress")]
    Busy,

    /// The timing base unit is not a positive number of milliseconds.
    #[error("invalid timing unit {unit_ms} ms, must be positive")]
    InvalidUnit { unit_ms: i64 },

    /// The encoded stream contains a character outside `.`, `-`, space.
    #[error("invalid symbol {symbol:?} at position {position} in encoded stream")]
    InvalidSymbol { position: usize, symbol: char },

    /// The upstream encoder was unreachable or returned non-success.
    #[error("encoder transport failed")]
    EncodeTransport(#[source] EncodeError),

    /// The run was cancelled at a token boundary. All sinks have been
    /// sent a deactivation before this is returned.
    #[error("transmission cancelled")]
    Cancelled,
}

/// Encoder collaborator failures.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The encoding request did not complete or returned non-success.
    #[error("encode request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The encoder answered with something the playback layer cannot
    /// use (characters outside `.`, `-`, space).
    #[error("encoder returned unusable payload: {reason}")]
    Payload { reason: String },
}

/// A single failed sink delivery.
///
/// These never cross the sink boundary: the dispatch worker logs the
/// error, bumps the failure counter and moves on to the next event.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The HTTP transport to the device failed.
    #[error("device request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The sink rejected or could not apply the event.
    #[error("sink rejected event: {reason}")]
    Rejected { reason: &'static str },
}
