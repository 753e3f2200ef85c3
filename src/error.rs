//! Error types for croscope

use thiserror::Error;

/// Errors that can occur while parsing, dispatching, or ingesting telemetry
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Transport failure: {0}")]
    TransportFailure(String),
}
