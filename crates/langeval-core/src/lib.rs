//! Core domain types and error definitions for the LangEval trace viewer.
//!
//! This crate provides the wire types shared across the workspace:
//!
//! - [`Observation`] and [`ObservationType`]: one span of a trace
//! - [`TraceDetail`] and [`TraceEnvelope`]: the upstream trace-detail payload
//! - [`Score`]: an evaluation score attached to an observation
//! - [`TraceError`]: error type for parsing and upstream access
//!
//! # Example
//!
//! ```rust
//! use langeval_core::{ObservationType, TraceEnvelope};
//!
//! let json = r#"{
//!     "data": {
//!         "name": "chat",
//!         "observations": [
//!             { "id": "root", "type": "SPAN", "startTime": "2024-02-03T10:30:00.000Z" },
//!             { "id": "llm", "type": "GENERATION", "parentObservationId": "root" }
//!         ]
//!     },
//!     "source": "langfuse"
//! }"#;
//!
//! let envelope = TraceEnvelope::from_json(json).unwrap();
//! assert!(envelope.source.is_live());
//! assert_eq!(envelope.data.observations[1].observation_type(), ObservationType::Generation);
//! ```

mod observation;
mod score;
pub mod timestamp;
mod trace;

pub use observation::{Observation, ObservationType, Usage};
pub use score::{Score, ScoreDataType};
pub use trace::{DataSource, TraceDetail, TraceEnvelope};

use thiserror::Error;

/// Errors that can occur while decoding or fetching trace data.
#[derive(Error, Debug)]
pub enum TraceError {
    /// Payload was not a valid trace document.
    #[error("Failed to parse trace payload: {0}")]
    Parse(String),

    /// Upstream service could not be reached.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// Upstream service answered with a non-success status.
    #[error("Upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// No trace with the requested id.
    #[error("Trace not found: {0}")]
    NotFound(String),

    /// The trace has no observation with the requested id.
    #[error("Observation not found: {0}")]
    ObservationNotFound(String),

    /// A path segment that cannot be sent upstream.
    #[error("Invalid path segment: {0:?}")]
    InvalidPath(String),
}

impl From<serde_json::Error> for TraceError {
    fn from(err: serde_json::Error) -> Self {
        TraceError::Parse(err.to_string())
    }
}
