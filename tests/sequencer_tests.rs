//! Behavioral tests for the playback sequencer.
//!
//! All tests run on the paused tokio clock, so the elapsed-time
//! assertions are exact sums of the timed waits; sink latency and
//! test-host speed never show up in them.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use rust_morse_machine::encode::{MorseEncoder, TableEncoder};
use rust_morse_machine::error::{EncodeError, SequenceError, SinkError};
use rust_morse_machine::sink::telemetry::wire_symbol;
use rust_morse_machine::sink::{ChannelSink, VisualSink};
use rust_morse_machine::token::Token;
use rust_morse_machine::{MorseMachine, PlaybackSequencer, TimingConfig};

/// Records every event it receives, in order.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ChannelSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn begin(&self, text: &str) -> Result<(), SinkError> {
        self.push(format!("begin:{text}"));
        Ok(())
    }

    async fn activate(&self) -> Result<(), SinkError> {
        self.push("activate".to_string());
        Ok(())
    }

    async fn deactivate(&self) -> Result<(), SinkError> {
        self.push("deactivate".to_string());
        Ok(())
    }

    async fn symbol(&self, token: Token) -> Result<(), SinkError> {
        self.push(format!("symbol:{}", wire_symbol(token)));
        Ok(())
    }

    async fn end(&self) -> Result<(), SinkError> {
        self.push("end".to_string());
        Ok(())
    }
}

/// Fails every single delivery.
struct DeadSink;

#[async_trait]
impl ChannelSink for DeadSink {
    fn name(&self) -> &'static str {
        "dead"
    }

    async fn begin(&self, _text: &str) -> Result<(), SinkError> {
        Err(SinkError::Rejected { reason: "dead" })
    }

    async fn activate(&self) -> Result<(), SinkError> {
        Err(SinkError::Rejected { reason: "dead" })
    }

    async fn deactivate(&self) -> Result<(), SinkError> {
        Err(SinkError::Rejected { reason: "dead" })
    }

    async fn symbol(&self, _token: Token) -> Result<(), SinkError> {
        Err(SinkError::Rejected { reason: "dead" })
    }

    async fn end(&self) -> Result<(), SinkError> {
        Err(SinkError::Rejected { reason: "dead" })
    }
}

/// Let detached dispatch workers drain their queues.
async fn drain() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_reference_timing_total() {
    let sequencer = PlaybackSequencer::new();

    // dot(200) + gap(200) + dash(600) + gap(200) + letter_gap(600)
    // + dot(200) + gap(200) + dash(600) + gap(200) = 3000 ms
    let start = Instant::now();
    sequencer
        .run("AA", ".- .-", TimingConfig::with_unit_ms(200), &[])
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn test_inter_symbol_spacing_is_one_dot_regardless_of_mark() {
    let sequencer = PlaybackSequencer::new();

    // Two dashes: (600 + 200) * 2.
    let start = Instant::now();
    sequencer
        .run("M", "--", TimingConfig::with_unit_ms(200), &[])
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_millis(1600));
}

#[tokio::test(start_paused = true)]
async fn test_word_gap_duration() {
    let sequencer = PlaybackSequencer::new();

    // dot(100) + gap(100) + word_gap(700) + dot(100) + gap(100)
    let start = Instant::now();
    sequencer
        .run("E E", ".    .", TimingConfig::with_unit_ms(100), &[])
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_millis(1100));
}

#[tokio::test(start_paused = true)]
async fn test_events_reach_sink_in_token_order() {
    let sequencer = PlaybackSequencer::new();
    let sink = Arc::new(RecordingSink::default());
    let sinks: Vec<Arc<dyn ChannelSink>> = vec![sink.clone()];

    sequencer
        .run("AA", ".- .-", TimingConfig::with_unit_ms(200), &sinks)
        .await
        .unwrap();
    drain().await;

    assert_eq!(
        sink.events(),
        [
            "begin:AA",
            "activate",
            "symbol:.",
            "deactivate",
            "activate",
            "symbol:-",
            "deactivate",
            "symbol:SPACE",
            "activate",
            "symbol:.",
            "deactivate",
            "activate",
            "symbol:-",
            "deactivate",
            "end",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_run_rejected_while_busy() {
    let sequencer = Arc::new(PlaybackSequencer::new());
    let sink = Arc::new(RecordingSink::default());
    let sinks: Vec<Arc<dyn ChannelSink>> = vec![sink.clone()];

    let first = {
        let sequencer = Arc::clone(&sequencer);
        let sinks = sinks.clone();
        tokio::spawn(
            async move { sequencer.run("E", ".", TimingConfig::with_unit_ms(200), &sinks).await },
        )
    };

    // Let the first run reach its timed wait.
    tokio::task::yield_now().await;
    assert!(sequencer.is_running());

    let second = sequencer
        .run("T", "-", TimingConfig::with_unit_ms(200), &sinks)
        .await;
    assert!(matches!(second, Err(SequenceError::Busy)));

    // The in-flight sequence is unaffected by the rejection.
    first.await.unwrap().unwrap();
    drain().await;
    assert_eq!(
        sink.events(),
        ["begin:E", "activate", "symbol:.", "deactivate", "end"]
    );
    assert!(!sequencer.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_dead_sink_changes_neither_duration_nor_result() {
    let sequencer = PlaybackSequencer::new();
    let sinks: Vec<Arc<dyn ChannelSink>> = vec![Arc::new(DeadSink)];

    let start = Instant::now();
    let result = sequencer
        .run("A", ".-", TimingConfig::with_unit_ms(200), &sinks)
        .await;

    assert!(result.is_ok());
    assert_eq!(start.elapsed(), Duration::from_millis(1200));

    // Every attempted delivery failed and was counted:
    // begin + 2 * (activate, symbol, deactivate) + end = 8.
    drain().await;
    assert_eq!(sequencer.sink_failure_count(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_forces_deactivation_and_frees_the_sequencer() {
    let sequencer = Arc::new(PlaybackSequencer::new());
    let sink = Arc::new(RecordingSink::default());
    let sinks: Vec<Arc<dyn ChannelSink>> = vec![sink.clone()];

    let run = {
        let sequencer = Arc::clone(&sequencer);
        let sinks = sinks.clone();
        tokio::spawn(async move {
            sequencer
                .run("S", "...", TimingConfig::with_unit_ms(200), &sinks)
                .await
        })
    };

    tokio::task::yield_now().await;
    sequencer.cancel();

    let result = run.await.unwrap();
    assert!(matches!(result, Err(SequenceError::Cancelled)));
    assert!(!sequencer.is_running());

    drain().await;
    let events = sink.events();
    assert_eq!(events.last().unwrap(), "deactivate");
    assert!(!events.contains(&"end".to_string()));

    // The sequencer is idle again and accepts the next run.
    sequencer
        .run("E", ".", TimingConfig::with_unit_ms(200), &sinks)
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_machine_plays_encoded_text_end_to_end() {
    let visual = Arc::new(VisualSink::new());
    let recording = Arc::new(RecordingSink::default());
    let sinks: Vec<Arc<dyn ChannelSink>> = vec![visual.clone(), recording.clone()];
    let machine = MorseMachine::new(TableEncoder, TimingConfig::with_unit_ms(100), sinks);

    let start = Instant::now();
    machine.transmit("SOS").await.unwrap();

    // 6 dots (100 + 100 each), 3 dashes (300 + 100 each),
    // 3 letter gaps (300 each): 1200 + 1200 + 900.
    assert_eq!(start.elapsed(), Duration::from_millis(3300));

    drain().await;
    assert_eq!(visual.transcript(), "...  ---  ...  ");
    assert!(!visual.is_lit());

    let events = recording.events();
    assert_eq!(events.first().unwrap(), "begin:SOS");
    assert_eq!(events.last().unwrap(), "end");
}

/// Encoder that never reaches its device.
struct OfflineEncoder;

#[async_trait]
impl MorseEncoder for OfflineEncoder {
    async fn encode(&self, _text: &str) -> Result<String, EncodeError> {
        Err(EncodeError::Payload {
            reason: "device offline".to_string(),
        })
    }
}

#[tokio::test(start_paused = true)]
async fn test_encoder_failure_aborts_before_any_sink_event() {
    let sink = Arc::new(RecordingSink::default());
    let sinks: Vec<Arc<dyn ChannelSink>> = vec![sink.clone()];
    let machine = MorseMachine::new(OfflineEncoder, TimingConfig::default(), sinks);

    let result = machine.transmit("SOS").await;

    assert!(matches!(result, Err(SequenceError::EncodeTransport(_))));
    assert!(!machine.sequencer().is_running());

    drain().await;
    assert!(sink.events().is_empty());
}
