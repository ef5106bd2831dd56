//! Trace monitoring views for LangEval.
//!
//! Header summaries of a trace and the evaluation scores recorded against
//! each observation.

pub mod scores;
mod summary;

pub use scores::{Grade, ScoreReport, ScoreSummary, ScoreView};
pub use summary::TraceSummary;
