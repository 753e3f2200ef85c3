//! Ingest pipeline orchestration
//!
//! Server-side path for one submission: parse → validate → generate
//! suggestions → append to the store → build the response body. Each
//! submission is handled independently; the only shared state is the
//! injected [`SessionStore`].

use tracing::info;

use crate::engine::SuggestionEngine;
use crate::error::TelemetryError;
use crate::store::SessionStore;
use crate::types::{ErrorResponse, IngestResponse, Submission};

/// Reported analysis confidence, constant by design
pub const REPORTED_CONFIDENCE: f64 = 0.87;

/// Parse a submission JSON body
pub fn parse_submission(json: &str) -> Result<Submission, TelemetryError> {
    let submission: Submission = serde_json::from_str(json)?;
    validate_submission(&submission)?;
    Ok(submission)
}

/// Structural validation beyond what deserialization enforces
fn validate_submission(submission: &Submission) -> Result<(), TelemetryError> {
    if submission.session_id.is_empty() {
        return Err(TelemetryError::MissingField("session_id".to_string()));
    }
    if submission.url.is_empty() {
        return Err(TelemetryError::MissingField("url".to_string()));
    }
    Ok(())
}

/// Ingest one submission JSON body into the given store (one-shot).
///
/// On success the submission is stored with its suggestions and the 200
/// response body is returned. On error nothing is stored; the caller maps
/// the error to a 400 via [`error_response`].
pub fn ingest(store: &SessionStore, json: &str) -> Result<IngestResponse, TelemetryError> {
    let submission = parse_submission(json)?;
    Ok(ingest_submission(store, submission))
}

/// Ingest an already-parsed submission
pub fn ingest_submission(store: &SessionStore, submission: Submission) -> IngestResponse {
    info!(url = %submission.url, session_id = %submission.session_id, "submission received");

    let suggestions =
        SuggestionEngine::generate(&submission.page_context, &submission.behavior_profile);
    let stored = store.append(submission, suggestions);

    info!(
        id = %stored.id,
        suggestions = stored.suggestions.len(),
        "submission processed"
    );

    IngestResponse {
        success: true,
        message: "Submission received and analyzed".to_string(),
        suggestions_count: stored.suggestions.len(),
        total_stored: store.count(),
        confidence: Some(REPORTED_CONFIDENCE),
    }
}

/// Map an ingest error to the 400 response body
pub fn error_response(error: &TelemetryError) -> ErrorResponse {
    ErrorResponse {
        error: "Failed to process submission".to_string(),
        details: Some(error.to_string()),
    }
}

/// Stateful pipeline owning its session store.
///
/// Use this when wiring the HTTP layer: one pipeline per process, torn down
/// with it. Tests construct a fresh pipeline each for isolation.
#[derive(Debug, Default)]
pub struct IngestPipeline {
    store: SessionStore,
}

impl IngestPipeline {
    /// Create a pipeline with an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline around an existing store
    pub fn with_store(store: SessionStore) -> Self {
        Self { store }
    }

    /// Process one submission JSON body
    pub fn process(&self, json: &str) -> Result<IngestResponse, TelemetryError> {
        ingest(&self.store, json)
    }

    /// Read access to the underlying store for dashboard rendering
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
