//! Trace header summary.

use langeval_core::{DataSource, TraceEnvelope};
use langeval_layout::waterfall;
use serde::Serialize;

const DEFAULT_STATUS: &str = "Success";

/// Aggregates shown above a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: String,
    /// Seconds.
    pub total_duration: f64,
    pub total_cost: f64,
    pub total_tokens: u64,
    pub observation_count: usize,
    pub source: DataSource,
    pub is_live: bool,
}

impl TraceSummary {
    pub fn from_envelope(envelope: &TraceEnvelope) -> Self {
        let trace = &envelope.data;
        let status = match trace.status.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => DEFAULT_STATUS.to_string(),
        };

        Self {
            id: trace.id.clone(),
            name: trace.name.clone(),
            status,
            total_duration: waterfall::total_duration(&trace.observations, trace.latency),
            total_cost: trace.total_cost.filter(|c| c.is_finite()).unwrap_or(0.0),
            total_tokens: trace.observations.iter().map(|o| o.total_tokens()).sum(),
            observation_count: trace.observations.len(),
            source: envelope.source.clone(),
            is_live: envelope.source.is_live(),
        }
    }

    /// Header line: `"<status> · 3.45s · $0.0042"`.
    pub fn headline(&self) -> String {
        format!(
            "{} \u{b7} {:.2}s \u{b7} ${:.4}",
            self.status, self.total_duration, self.total_cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_from_langfuse_envelope() {
        let envelope: TraceEnvelope = serde_json::from_value(json!({
            "data": {
                "id": "trc_001",
                "name": "chat-rag-pipeline",
                "latency": 3.45,
                "totalCost": 0.0042,
                "observations": [
                    { "id": "a", "usage": { "totalTokens": 1200 } },
                    { "id": "b", "usage": { "promptTokens": 10, "completionTokens": 5 } }
                ]
            },
            "source": "langfuse"
        }))
        .unwrap();

        let summary = TraceSummary::from_envelope(&envelope);
        assert_eq!(summary.status, "Success");
        assert_eq!(summary.total_duration, 3.45);
        assert_eq!(summary.total_tokens, 1215);
        assert_eq!(summary.observation_count, 2);
        assert!(summary.is_live);
        assert_eq!(summary.headline(), "Success \u{b7} 3.45s \u{b7} $0.0042");
    }

    #[test]
    fn test_summary_defaults() {
        let envelope = TraceEnvelope::from_json(r#"{"data": {"status": "error"}, "source": "mock"}"#)
            .unwrap();
        let summary = TraceSummary::from_envelope(&envelope);
        assert_eq!(summary.status, "error");
        assert_eq!(summary.total_cost, 0.0);
        assert_eq!(summary.total_duration, 0.0);
        assert!(!summary.is_live);
    }
}
