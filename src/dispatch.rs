//! Best-effort event delivery to sinks.
//!
//! One dispatcher per sink per run: an unbounded queue drained by a
//! detached worker task. Enqueueing never blocks and never fails the
//! sequencer, so sink latency cannot stretch the timed waits; the queue
//! preserves per-sink event order. A failed delivery is logged, counted
//! and forgotten; the worker moves on to the next event.
//!
//! Workers exit when their dispatcher is dropped, after draining
//! whatever is still queued.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::sink::ChannelSink;
use crate::token::Token;

/// An event fanned out to one sink.
#[derive(Clone, Debug)]
pub enum SinkEvent {
    Begin(String),
    Activate,
    Deactivate,
    Symbol(Token),
    End,
}

/// Fire-and-forget delivery queue for one sink.
pub struct SinkDispatcher {
    tx: mpsc::UnboundedSender<SinkEvent>,
    failures: Arc<AtomicU32>,
    sink_name: &'static str,
}

impl SinkDispatcher {
    /// Spawn the worker for `sink`. Failed deliveries increment
    /// `failures`, which the caller shares across dispatchers.
    pub fn spawn(sink: Arc<dyn ChannelSink>, failures: Arc<AtomicU32>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SinkEvent>();
        let sink_name = sink.name();

        let worker_failures = Arc::clone(&failures);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let result = match &event {
                    SinkEvent::Begin(text) => sink.begin(text).await,
                    SinkEvent::Activate => sink.activate().await,
                    SinkEvent::Deactivate => sink.deactivate().await,
                    SinkEvent::Symbol(token) => sink.symbol(*token).await,
                    SinkEvent::End => sink.end().await,
                };

                if let Err(error) = result {
                    worker_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(sink = sink_name, %error, ?event, "sink delivery failed");
                }
            }
        });

        Self {
            tx,
            failures,
            sink_name,
        }
    }

    /// Enqueue an event. Never blocks; if the worker is gone the event
    /// counts as a failed delivery.
    pub fn dispatch(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
            warn!(sink = self.sink_name, "sink worker gone, event dropped");
        }
    }
}
