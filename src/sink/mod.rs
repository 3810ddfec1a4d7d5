//! Channel sinks: the consumers of playback events.
//!
//! Sinks are isolated from the sequencer and from each other. Each call
//! is independent and may fail; the dispatch layer swallows the error
//! and the sequence keeps its timing. A sink only implements the events
//! it cares about; the rest default to no-ops.
//!
//! Conventional channel order is visual, physical, telemetry; the
//! sequencer notifies sinks in the order of the slice it is given.

pub mod physical;
pub mod telemetry;
pub mod visual;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::token::Token;

pub use physical::{HttpPinTransport, PhysicalSink, PinCommand, PinTransport};
pub use telemetry::{HttpTelemetryTransport, TelemetryEvent, TelemetrySink, TelemetryTransport};
pub use visual::VisualSink;

/// A channel receiving playback events.
///
/// # Contract
///
/// Every call returns (or fails) without reaching into the sequencer's
/// control flow: a sink error is contained at the dispatch layer and
/// never alters playback timing or state. Delivery is best-effort and
/// asynchronous; a sink must not rely on being called in real time,
/// only on receiving its events in order.
#[async_trait]
pub trait ChannelSink: Send + Sync {
    /// Channel name used in delivery-failure logs.
    fn name(&self) -> &'static str;

    /// A transmission is starting for `text`.
    async fn begin(&self, _text: &str) -> Result<(), SinkError> {
        Ok(())
    }

    /// The signal goes active (start of a mark).
    async fn activate(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// The signal goes inactive (end of a mark).
    async fn deactivate(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// A token of the stream is being played.
    async fn symbol(&self, _token: Token) -> Result<(), SinkError> {
        Ok(())
    }

    /// The transmission is complete.
    async fn end(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
