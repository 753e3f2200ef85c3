//! In-session event recording
//!
//! The recorder owns the ordered buffer of interaction events for one
//! browsing session. Draining is an atomic swap: a drain observes a final,
//! consistent snapshot of the buffer, and no event can land in two batches.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::types::InteractionEvent;

/// Identity of one browsing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    /// Client-generated identifier derived from the session start time
    pub id: String,
    /// Session start time
    pub started_at: DateTime<Utc>,
}

impl SessionHandle {
    /// Create a handle for a session that started at the given instant
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            id: format!("session_{}", started_at.timestamp_millis()),
            started_at,
        }
    }
}

/// Ordered, drain-once buffer of interaction events.
///
/// The buffer is wrapped in a mutex so that `record` and `drain` serialize
/// against each other; a drain swaps the whole buffer out in one step.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<InteractionEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the in-session sequence
    pub fn record(&self, event: InteractionEvent) {
        self.guard().push(event);
    }

    /// Atomically take the current sequence and reset the buffer to empty
    pub fn drain(&self) -> Vec<InteractionEvent> {
        std::mem::take(&mut *self.guard())
    }

    /// Number of currently buffered events
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Vec<InteractionEvent>> {
        // A poisoned lock only means another thread panicked mid-push; the
        // buffer itself is still a valid Vec, so recover it.
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, sec).unwrap()
    }

    #[test]
    fn test_session_id_derived_from_start_time() {
        let started = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let session = SessionHandle::new(started);
        assert_eq!(
            session.id,
            format!("session_{}", started.timestamp_millis())
        );
    }

    #[test]
    fn test_record_preserves_arrival_order() {
        let recorder = EventRecorder::new();
        recorder.record(InteractionEvent::scroll(at(1), 10));
        recorder.record(InteractionEvent::scroll(at(2), 20));
        recorder.record(InteractionEvent::scroll(at(3), 30));

        let batch = recorder.drain();
        let percents: Vec<u8> = batch.iter().filter_map(|e| e.scroll).map(|s| s.percent).collect();
        assert_eq!(percents, vec![10, 20, 30]);
    }

    #[test]
    fn test_drain_twice_yields_empty_second_batch() {
        let recorder = EventRecorder::new();
        recorder.record(InteractionEvent::test(at(1), 1));
        recorder.record(InteractionEvent::test(at(2), 2));

        let first = recorder.drain();
        let second = recorder.drain();

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
    }

    #[test]
    fn test_no_event_in_two_batches() {
        let recorder = EventRecorder::new();
        recorder.record(InteractionEvent::test(at(1), 1));
        let first = recorder.drain();

        recorder.record(InteractionEvent::test(at(2), 2));
        let second = recorder.drain();

        assert_eq!(first[0].test.unwrap().number, 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].test.unwrap().number, 2);
    }

    #[test]
    fn test_len_tracks_buffer() {
        let recorder = EventRecorder::new();
        assert!(recorder.is_empty());
        recorder.record(InteractionEvent::test(at(1), 1));
        assert_eq!(recorder.len(), 1);
        recorder.drain();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_concurrent_record_and_drain() {
        use std::sync::Arc;

        let recorder = Arc::new(EventRecorder::new());
        let writer = {
            let recorder = Arc::clone(&recorder);
            std::thread::spawn(move || {
                for i in 0..200 {
                    recorder.record(InteractionEvent::test(at(0), i));
                }
            })
        };

        let mut drained = Vec::new();
        for _ in 0..50 {
            drained.extend(recorder.drain());
        }
        writer.join().unwrap();
        drained.extend(recorder.drain());

        // Every event lands in exactly one batch.
        assert_eq!(drained.len(), 200);
    }
}
