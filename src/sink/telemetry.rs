//! Telemetry channel: structured playback events.
//!
//! Mirrors the device's serial log: the text at transmission start,
//! each symbol as it plays, and an end marker that closes the line.
//! Delivery is best-effort with the same tolerance as the physical
//! channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::token::{GapKind, MarkKind, Token};

use super::ChannelSink;

/// A telemetry event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A transmission started for `text`.
    Begin { text: String },
    /// A token was played.
    Symbol { token: Token },
    /// The transmission finished.
    End,
}

/// Wire form of a token on the serial log: marks as themselves, gaps as
/// `SPACE` / `WORD` markers.
pub fn wire_symbol(token: Token) -> &'static str {
    match token {
        Token::Mark(MarkKind::Dot) => ".",
        Token::Mark(MarkKind::Dash) => "-",
        Token::Gap(GapKind::Letter) => "SPACE",
        Token::Gap(GapKind::Word) => "WORD",
    }
}

/// Transport carrying telemetry events off-process.
#[async_trait]
pub trait TelemetryTransport: Send + Sync {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), SinkError>;
}

/// HTTP transport: `GET {base}/serial?start=|symbol=|end=1`.
pub struct HttpTelemetryTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTelemetryTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(concat!("rust-morse-machine/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("failed to build telemetry http client"),
        }
    }
}

#[async_trait]
impl TelemetryTransport for HttpTelemetryTransport {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), SinkError> {
        let query: [(&str, String); 1] = match event {
            TelemetryEvent::Begin { text } => [("start", text.clone())],
            TelemetryEvent::Symbol { token } => [("symbol", wire_symbol(*token).to_string())],
            TelemetryEvent::End => [("end", "1".to_string())],
        };

        self.client
            .get(format!("{}/serial", self.base_url))
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Telemetry sink.
pub struct TelemetrySink<T> {
    transport: T,
}

impl<T: TelemetryTransport> TelemetrySink<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<T: TelemetryTransport> ChannelSink for TelemetrySink<T> {
    fn name(&self) -> &'static str {
        "telemetry"
    }

    async fn begin(&self, text: &str) -> Result<(), SinkError> {
        self.transport
            .send(&TelemetryEvent::Begin {
                text: text.to_string(),
            })
            .await
    }

    async fn symbol(&self, token: Token) -> Result<(), SinkError> {
        self.transport.send(&TelemetryEvent::Symbol { token }).await
    }

    async fn end(&self) -> Result<(), SinkError> {
        self.transport.send(&TelemetryEvent::End).await
    }
}
