//! Playback sequencer: the timed core of the machine.
//!
//! Converts a token stream into activation/deactivation events on
//! every sink, with the standard Morse cadence between them. One
//! transmission at a time: a run requested while another is in flight
//! is rejected immediately, never queued.
//!
//! # Ordering
//!
//! For a single run, events reach each sink strictly in token order
//! (per-sink FIFO queues, see [`crate::dispatch`]); no two tokens'
//! events interleave. Sink notifications are enqueued before the timed
//! wait starts and race the timer; their completion time never
//! stretches playback.
//!
//! # Suspension
//!
//! The only suspension points are the timed waits. They are
//! cooperative (`tokio::time::sleep`), so the host stays responsive
//! during a transmission; the busy gate, not a lock, is what keeps a
//! second run out.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::TimingConfig;
use crate::dispatch::{SinkDispatcher, SinkEvent};
use crate::error::SequenceError;
use crate::sink::ChannelSink;
use crate::timing::Timing;
use crate::token::{tokenize, GapKind, Token};

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;

/// Session outcome, for the run-level log record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// One playback session. Created per run, destroyed when the run
/// returns; no two sessions exist concurrently.
struct Session {
    text: String,
    tokens: Vec<Token>,
    state: SessionState,
}

impl Session {
    fn new(text: &str, tokens: Vec<Token>) -> Self {
        Self {
            text: text.to_string(),
            tokens,
            state: SessionState::Idle,
        }
    }
}

/// Resets the sequencer to idle when the run returns, on every path.
struct RunGuard<'a> {
    state: &'a AtomicU8,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.state.store(STATE_IDLE, Ordering::Release);
    }
}

/// The playback sequencer.
///
/// One instance per device session. `run()` is the only entry point;
/// non-reentrancy is enforced by the running state, not by a lock.
pub struct PlaybackSequencer {
    state: AtomicU8,
    cancelled: AtomicBool,

    /// Failed sink deliveries across all runs. Never cleared; history
    /// is kept for diagnostics.
    sink_failures: Arc<AtomicU32>,
}

impl PlaybackSequencer {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(STATE_IDLE),
            cancelled: AtomicBool::new(false),
            sink_failures: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Whether a transmission is currently in flight.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_RUNNING
    }

    /// Request cancellation of the in-flight run.
    ///
    /// Takes effect at the next token boundary: the run forces a
    /// deactivation on every sink and returns
    /// [`SequenceError::Cancelled`]. A no-op when nothing is running;
    /// the flag is cleared at the start of every run.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Total failed sink deliveries since creation.
    #[inline]
    pub fn sink_failure_count(&self) -> u32 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Play an encoded symbol stream across the given sinks.
    ///
    /// Sinks are notified in slice order; keep it visual, physical,
    /// telemetry by convention. Fails with `Busy` while another run is
    /// in flight, `InvalidUnit` / `InvalidSymbol` before any sink has
    /// been notified, `Cancelled` when aborted mid-run.
    pub async fn run(
        &self,
        text: &str,
        encoded: &str,
        config: TimingConfig,
        sinks: &[Arc<dyn ChannelSink>],
    ) -> Result<(), SequenceError> {
        if self
            .state
            .compare_exchange(STATE_IDLE, STATE_RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SequenceError::Busy);
        }
        let _guard = RunGuard { state: &self.state };
        self.cancelled.store(false, Ordering::Release);

        // Timing is read once here and held for the whole run; both
        // validations abort before any sink is notified.
        let timing = Timing::derive(config)?;
        let tokens = tokenize(encoded).collect::<Result<Vec<_>, _>>()?;

        let mut session = Session::new(text, tokens);
        let dispatchers: Vec<SinkDispatcher> = sinks
            .iter()
            .map(|sink| SinkDispatcher::spawn(Arc::clone(sink), Arc::clone(&self.sink_failures)))
            .collect();

        session.state = SessionState::Running;
        info!(
            text = %session.text,
            tokens = session.tokens.len(),
            "transmission start"
        );
        fan_out(&dispatchers, SinkEvent::Begin(session.text.clone()));

        for &token in &session.tokens {
            if self.cancelled.load(Ordering::Acquire) {
                fan_out(&dispatchers, SinkEvent::Deactivate);
                session.state = SessionState::Failed;
                info!(text = %session.text, state = ?session.state, "transmission cancelled");
                return Err(SequenceError::Cancelled);
            }

            debug!(?token, "playing token");
            match token {
                Token::Mark(kind) => {
                    fan_out(&dispatchers, SinkEvent::Activate);
                    fan_out(&dispatchers, SinkEvent::Symbol(token));
                    sleep(timing.for_mark(kind)).await;

                    fan_out(&dispatchers, SinkEvent::Deactivate);
                    // Fixed inter-symbol spacing, one unit regardless
                    // of mark length.
                    sleep(timing.dot).await;
                }
                Token::Gap(GapKind::Letter) => {
                    fan_out(&dispatchers, SinkEvent::Symbol(token));
                    sleep(timing.letter_gap).await;
                }
                Token::Gap(GapKind::Word) => {
                    fan_out(&dispatchers, SinkEvent::Symbol(token));
                    sleep(timing.word_gap).await;
                }
            }
        }

        fan_out(&dispatchers, SinkEvent::End);
        session.state = SessionState::Completed;
        info!(text = %session.text, state = ?session.state, "transmission complete");
        Ok(())
    }
}

impl Default for PlaybackSequencer {
    fn default() -> Self {
        Self::new()
    }
}

fn fan_out(dispatchers: &[SinkDispatcher], event: SinkEvent) {
    for dispatcher in dispatchers {
        dispatcher.dispatch(event.clone());
    }
}
