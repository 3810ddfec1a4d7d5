//! Visual channel: in-process lamp state plus a transcript line.
//!
//! The lamp mirrors mark activation; the transcript accumulates the
//! symbols of the current transmission into a morse line a UI can
//! render. Neither can fail.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::SinkError;
use crate::token::Token;

use super::ChannelSink;

/// In-process visual indicator.
pub struct VisualSink {
    lamp: watch::Sender<bool>,
    transcript: Mutex<String>,
}

impl VisualSink {
    pub fn new() -> Self {
        let (lamp, _) = watch::channel(false);
        Self {
            lamp,
            transcript: Mutex::new(String::new()),
        }
    }

    /// Subscribe to lamp state changes. `true` while a mark is active.
    pub fn lamp(&self) -> watch::Receiver<bool> {
        self.lamp.subscribe()
    }

    /// Whether the lamp is currently lit.
    pub fn is_lit(&self) -> bool {
        *self.lamp.borrow()
    }

    /// The transcript of the current (or last) transmission.
    pub fn transcript(&self) -> String {
        self.transcript.lock().expect("transcript lock poisoned").clone()
    }
}

impl Default for VisualSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelSink for VisualSink {
    fn name(&self) -> &'static str {
        "visual"
    }

    async fn begin(&self, _text: &str) -> Result<(), SinkError> {
        self.transcript.lock().expect("transcript lock poisoned").clear();
        Ok(())
    }

    async fn activate(&self) -> Result<(), SinkError> {
        self.lamp.send_replace(true);
        Ok(())
    }

    async fn deactivate(&self) -> Result<(), SinkError> {
        self.lamp.send_replace(false);
        Ok(())
    }

    async fn symbol(&self, token: Token) -> Result<(), SinkError> {
        self.transcript
            .lock()
            .expect("transcript lock poisoned")
            .push_str(token.glyph());
        Ok(())
    }
}
