//! Session store
//!
//! Process-wide, append-only log of received submissions. The store is an
//! explicitly owned value with no module-level singleton: construct one at
//! process start, inject it where needed, and it dies with the process.
//! Appends are serialized through a mutex so concurrent submissions cannot
//! interleave or lose updates.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::types::{StoredSubmission, Submission, Suggestion};

/// Aggregate counters for dashboard rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Total submissions stored
    pub total_submissions: usize,
    /// Sum of suggestion counts across all submissions
    pub total_suggestions: usize,
    /// Submissions whose batch contained at least one click
    pub active_sessions: usize,
}

/// Append-only log of stored submissions
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: Mutex<Vec<StoredSubmission>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a submission with its generated suggestions.
    ///
    /// Assigns the server-side id and receive timestamp, and returns the
    /// stored record. Stored submissions are never updated or deleted.
    pub fn append(&self, submission: Submission, suggestions: Vec<Suggestion>) -> StoredSubmission {
        let stored = StoredSubmission {
            id: Uuid::new_v4().to_string(),
            received_at: Utc::now(),
            submission,
            suggestions,
        };

        let mut entries = self.guard();
        entries.push(stored.clone());
        info!(
            id = %stored.id,
            url = %stored.submission.url,
            suggestions = stored.suggestions.len(),
            total = entries.len(),
            "submission stored"
        );
        stored
    }

    /// Number of stored submissions
    pub fn count(&self) -> usize {
        self.guard().len()
    }

    /// The most recently appended submission, if any
    pub fn latest(&self) -> Option<StoredSubmission> {
        self.guard().last().cloned()
    }

    /// Sum of suggestion counts across all stored submissions
    pub fn aggregate_suggestion_count(&self) -> usize {
        self.guard().iter().map(|e| e.suggestions.len()).sum()
    }

    /// Receive time of the most recent submission
    pub fn last_received_at(&self) -> Option<DateTime<Utc>> {
        self.guard().last().map(|e| e.received_at)
    }

    /// Snapshot of the aggregate counters in one lock acquisition
    pub fn stats(&self) -> StoreStats {
        let entries = self.guard();
        StoreStats {
            total_submissions: entries.len(),
            total_suggestions: entries.iter().map(|e| e.suggestions.len()).sum(),
            active_sessions: entries
                .iter()
                .filter(|e| e.submission.behavior_profile.total_clicks.unwrap_or(0) > 0)
                .count(),
        }
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Vec<StoredSubmission>> {
        // Entries are append-only, so a poisoned lock still holds a valid
        // prefix of the log; recover it rather than tearing the process down.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
