//! Physical channel: drives the device output pin.
//!
//! The sink owns the channel configuration and translates activation
//! booleans into [`PinCommand`]s; the transport carries them to the pin
//! driver, which applies the polarity. Transport failures (network,
//! hardware) are expected and contained by the dispatch layer.

use async_trait::async_trait;

use crate::config::ChannelConfig;
use crate::error::SinkError;

use super::ChannelSink;

/// Command forwarded to the pin driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinCommand {
    /// Desired logical state; the driver maps it to a pin level.
    pub activate: bool,

    /// Target pin number.
    pub pin: u8,

    /// Inverted polarity flag, applied by the driver.
    pub inverted: bool,
}

/// Transport to the pin driver.
#[async_trait]
pub trait PinTransport: Send + Sync {
    async fn drive(&self, command: PinCommand) -> Result<(), SinkError>;
}

/// HTTP transport: `GET {base}/gpio?state=&gpio=&inv=`.
pub struct HttpPinTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPinTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(concat!("rust-morse-machine/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("failed to build gpio http client"),
        }
    }
}

#[async_trait]
impl PinTransport for HttpPinTransport {
    async fn drive(&self, command: PinCommand) -> Result<(), SinkError> {
        self.client
            .get(format!("{}/gpio", self.base_url))
            .query(&[
                ("state", u8::from(command.activate).to_string()),
                ("gpio", command.pin.to_string()),
                ("inv", u8::from(command.inverted).to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Physical output sink.
pub struct PhysicalSink<T> {
    config: ChannelConfig,
    transport: T,
}

impl<T: PinTransport> PhysicalSink<T> {
    pub fn new(config: ChannelConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> ChannelConfig {
        self.config
    }

    fn command(&self, activate: bool) -> PinCommand {
        PinCommand {
            activate,
            pin: self.config.pin,
            inverted: self.config.inverted,
        }
    }
}

#[async_trait]
impl<T: PinTransport> ChannelSink for PhysicalSink<T> {
    fn name(&self) -> &'static str {
        "physical"
    }

    async fn activate(&self) -> Result<(), SinkError> {
        self.transport.drive(self.command(true)).await
    }

    async fn deactivate(&self) -> Result<(), SinkError> {
        self.transport.drive(self.command(false)).await
    }
}
