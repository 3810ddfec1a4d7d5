//! Text → Morse encoding collaborators.
//!
//! The sequencer never encodes; it consumes an already-encoded string.
//! Two encoder implementations are provided:
//!
//! - [`TableEncoder`]: the local letter table. Letters are joined by two
//!   spaces, word breaks expand to four, so downstream gap
//!   classification (`>= 4` spaces = word) falls out of the spacing.
//! - [`HttpEncoder`]: asks the device itself (`GET /morse?text=`), for
//!   hosts that want the firmware to stay the single source of truth.

use async_trait::async_trait;

use crate::error::EncodeError;

/// Spacing appended after every encoded letter.
const LETTER_SPACING: &str = "  ";

/// Spacing emitted for a word break in the input text.
const WORD_SPACING: &str = "    ";

/// Encoder capability.
///
/// Implementations may be remote; failures surface as
/// [`EncodeError::Transport`] and abort a transmission before any token
/// is processed.
#[async_trait]
pub trait MorseEncoder: Send + Sync {
    /// Encode `text` into a string of `.`, `-` and spaces.
    async fn encode(&self, text: &str) -> Result<String, EncodeError>;
}

/// Local table encoder.
///
/// Characters without a table entry are skipped silently, matching the
/// device firmware. Case-insensitive.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableEncoder;

impl TableEncoder {
    /// Morse code for a single character, if it has one.
    pub fn code_for(c: char) -> Option<&'static str> {
        match c.to_ascii_uppercase() {
            'A' => Some(".-"),
            'B' => Some("-..."),
            'C' => Some("-.-."),
            'D' => Some("-.."),
            'E' => Some("."),
            'F' => Some("..-."),
            'G' => Some("--."),
            'H' => Some("...."),
            'I' => Some(".."),
            'J' => Some(".---"),
            'K' => Some("-.-"),
            'L' => Some(".-.."),
            'M' => Some("--"),
            'N' => Some("-."),
            'O' => Some("---"),
            'P' => Some(".--."),
            'Q' => Some("--.-"),
            'R' => Some(".-."),
            'S' => Some("..."),
            'T' => Some("-"),
            'U' => Some("..-"),
            'V' => Some("...-"),
            'W' => Some(".--"),
            'X' => Some("-..-"),
            'Y' => Some("-.--"),
            'Z' => Some("--.."),
            '1' => Some(".----"),
            '2' => Some("..---"),
            '3' => Some("...--"),
            '4' => Some("....-"),
            '5' => Some("....."),
            '6' => Some("-...."),
            '7' => Some("--..."),
            '8' => Some("---.."),
            '9' => Some("----."),
            '0' => Some("-----"),
            _ => None,
        }
    }

    /// Encode a whole text, synchronously.
    pub fn encode_text(text: &str) -> String {
        let mut morse = String::new();

        for c in text.chars() {
            if c == ' ' {
                morse.push_str(WORD_SPACING);
            } else if let Some(code) = Self::code_for(c) {
                morse.push_str(code);
                morse.push_str(LETTER_SPACING);
            }
        }

        morse
    }
}

#[async_trait]
impl MorseEncoder for TableEncoder {
    async fn encode(&self, text: &str) -> Result<String, EncodeError> {
        Ok(Self::encode_text(text))
    }
}

/// Remote encoder: fetches the encoding from the device.
pub struct HttpEncoder {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEncoder {
    /// Create an encoder for a device reachable at `base_url`
    /// (e.g. `http://192.168.1.40`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(concat!("rust-morse-machine/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("failed to build encoder http client"),
        }
    }
}

#[async_trait]
impl MorseEncoder for HttpEncoder {
    async fn encode(&self, text: &str) -> Result<String, EncodeError> {
        let morse = self
            .client
            .get(format!("{}/morse", self.base_url))
            .query(&[("text", text)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if let Some(bad) = morse.chars().find(|c| !matches!(c, '.' | '-' | ' ')) {
            return Err(EncodeError::Payload {
                reason: format!("unexpected {bad:?} in device response"),
            });
        }

        Ok(morse)
    }
}
