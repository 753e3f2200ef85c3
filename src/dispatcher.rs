//! Batch dispatch
//!
//! Decides when buffered events become a submission and hands it to a
//! transport. Two triggers exist: the size threshold (default 3) and the
//! once-only page teardown. Delivery is at-most-once by design: a failed
//! send is logged and the batch is dropped, never retried or re-queued.

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::TelemetryError;
use crate::recorder::{EventRecorder, SessionHandle};
use crate::summarizer::BehaviorSummarizer;
use crate::types::{InteractionEvent, PageContext, Submission};

/// Default number of buffered events that triggers a flush
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Delivery seam between the dispatcher and the collection endpoint
pub trait Transport {
    /// Deliver a threshold-triggered submission. Errors are reported back
    /// only so the dispatcher can log them; they are never acted upon.
    fn send(&self, submission: &Submission) -> Result<(), TelemetryError>;

    /// Deliver a teardown submission. One-way: nothing is awaited and no
    /// outcome is observable, mirroring a beacon-style send.
    fn send_final(&self, submission: &Submission);
}

/// Dispatch configuration
#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    /// Buffered event count at which the threshold trigger fires
    pub batch_size: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Accumulates events for one session and transmits drained batches
pub struct BatchDispatcher<T: Transport> {
    recorder: EventRecorder,
    session: SessionHandle,
    config: DispatchConfig,
    transport: T,
    final_sent: bool,
}

impl<T: Transport> BatchDispatcher<T> {
    /// Create a dispatcher for the given session with the default batch size
    pub fn new(session: SessionHandle, transport: T) -> Self {
        Self::with_config(session, transport, DispatchConfig::default())
    }

    pub fn with_config(session: SessionHandle, transport: T, config: DispatchConfig) -> Self {
        Self {
            recorder: EventRecorder::new(),
            session,
            config,
            transport,
            final_sent: false,
        }
    }

    /// Record an event; flushes when the buffer reaches the batch size
    pub fn record(&mut self, event: InteractionEvent, context: &PageContext) {
        self.recorder.record(event);
        if self.recorder.len() >= self.config.batch_size {
            self.flush(context);
        }
    }

    /// Drain the buffer and transmit it as one submission.
    ///
    /// Returns true when a non-empty batch was dispatched. Delivery failures
    /// are logged and swallowed; the batch is gone either way.
    pub fn flush(&mut self, context: &PageContext) -> bool {
        let batch = self.recorder.drain();
        if batch.is_empty() {
            return false;
        }

        let submission = self.build_submission(batch, context, false);
        match self.transport.send(&submission) {
            Ok(()) => {
                debug!(
                    session_id = %submission.session_id,
                    events = submission.events.len(),
                    "batch dispatched"
                );
            }
            Err(e) => {
                warn!(
                    session_id = %submission.session_id,
                    events = submission.events.len(),
                    error = %e,
                    "batch dropped after transport failure"
                );
            }
        }
        true
    }

    /// Teardown trigger: fires at most once, on page unload.
    ///
    /// An empty buffer is a no-op. The send is fire-and-forget so it cannot
    /// block navigation.
    pub fn teardown(&mut self, context: &PageContext) {
        if self.final_sent {
            return;
        }
        self.final_sent = true;

        let batch = self.recorder.drain();
        if batch.is_empty() {
            return;
        }

        let submission = self.build_submission(batch, context, true);
        debug!(
            session_id = %submission.session_id,
            events = submission.events.len(),
            "final batch dispatched"
        );
        self.transport.send_final(&submission);
    }

    /// Number of events waiting for the next trigger
    pub fn pending(&self) -> usize {
        self.recorder.len()
    }

    /// The session this dispatcher belongs to
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn build_submission(
        &self,
        events: Vec<InteractionEvent>,
        context: &PageContext,
        is_final: bool,
    ) -> Submission {
        let now = Utc::now();
        let behavior_profile =
            BehaviorSummarizer::summarize(&events, self.session.started_at, now);

        Submission {
            session_id: self.session.id.clone(),
            timestamp: now,
            url: context.url.clone(),
            events,
            page_context: context.clone(),
            behavior_profile,
            is_final,
        }
    }
}
