//! Croscope - behavioral telemetry batching and CRO suggestion engine
//!
//! Croscope collects page interaction events, folds them into behavioral
//! profiles, and derives ranked improvement suggestions through a
//! deterministic pipeline: record → debounce/batch → summarize → dispatch →
//! ingest → suggest → store.
//!
//! ## Modules
//!
//! - **Client side**: event recorder, scroll debouncer, behavior summarizer,
//!   batch dispatcher with a pluggable transport
//! - **Server side**: suggestion engine, session store, ingest pipeline

pub mod context;
pub mod debounce;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod recorder;
pub mod store;
pub mod summarizer;
pub mod types;

pub use debounce::ScrollDebouncer;
pub use dispatcher::{BatchDispatcher, DispatchConfig, Transport, DEFAULT_BATCH_SIZE};
pub use engine::SuggestionEngine;
pub use error::TelemetryError;
pub use pipeline::{ingest, IngestPipeline};
pub use recorder::{EventRecorder, SessionHandle};
pub use store::{SessionStore, StoreStats};
pub use summarizer::BehaviorSummarizer;
pub use types::{
    BehaviorProfile, InteractionEvent, PageContext, PageType, Priority, StoredSubmission,
    Submission, Suggestion,
};

/// Croscope version embedded in CLI output
pub const CROSCOPE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for diagnostics
pub const PRODUCER_NAME: &str = "croscope";
