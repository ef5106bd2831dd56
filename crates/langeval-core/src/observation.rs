//! Observation (span) records as returned by the tracing backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::score::Score;
use crate::timestamp;

/// Categorical tag of an observation.
///
/// The upstream set is open; anything unrecognized maps to [`ObservationType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationType {
    Chain,
    Tool,
    Model,
    Generation,
    Other,
}

impl ObservationType {
    /// Parses a raw type tag, ignoring case.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return ObservationType::Other;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "chain" => ObservationType::Chain,
            "tool" => ObservationType::Tool,
            "model" => ObservationType::Model,
            "generation" => ObservationType::Generation,
            _ => ObservationType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationType::Chain => "chain",
            ObservationType::Tool => "tool",
            ObservationType::Model => "model",
            ObservationType::Generation => "generation",
            ObservationType::Other => "other",
        }
    }
}

/// Token counts reported for an observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default, alias = "input", skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, alias = "output", skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(default, alias = "total", skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl Usage {
    /// Reported total, or the sum of the parts when no total was sent.
    pub fn total(&self) -> u64 {
        self.total_tokens.unwrap_or_else(|| {
            self.prompt_tokens.unwrap_or(0) + self.completion_tokens.unwrap_or(0)
        })
    }
}

/// One unit of execution within a trace.
///
/// Fields the viewer does not interpret are kept in `extra` and written back
/// unchanged on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_observation_id: Option<String>,
    /// Raw type tag as sent upstream (e.g. `"GENERATION"`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_total_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub output: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<Score>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Observation {
    /// Creates a bare observation with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_observation_id: None,
            kind: None,
            name: None,
            start_time: None,
            end_time: None,
            calculated_total_cost: None,
            usage: None,
            input: Value::Null,
            output: Value::Null,
            level: None,
            status_message: None,
            model: None,
            scores: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_observation_id = Some(parent_id.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_times(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.calculated_total_cost = Some(cost);
        self
    }

    pub fn observation_type(&self) -> ObservationType {
        ObservationType::parse(self.kind.as_deref())
    }

    /// Lowercased raw type tag, `"span"` when none was sent.
    pub fn type_label(&self) -> String {
        match self.kind.as_deref().map(str::trim) {
            Some(kind) if !kind.is_empty() => kind.to_ascii_lowercase(),
            _ => "span".to_string(),
        }
    }

    /// Display label: the name, else the raw type tag, else `"span"`.
    pub fn label(&self) -> String {
        let name = self.name.as_deref().filter(|n| !n.is_empty());
        let kind = self.kind.as_deref().map(str::trim).filter(|k| !k.is_empty());
        name.or(kind).unwrap_or("span").to_string()
    }

    pub fn total_tokens(&self) -> u64 {
        self.usage.as_ref().map(Usage::total).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_observation_type_is_case_insensitive() {
        assert_eq!(ObservationType::parse(Some("GENERATION")), ObservationType::Generation);
        assert_eq!(ObservationType::parse(Some("Tool")), ObservationType::Tool);
        assert_eq!(ObservationType::parse(Some("chain")), ObservationType::Chain);
        assert_eq!(ObservationType::parse(Some("model")), ObservationType::Model);
        assert_eq!(ObservationType::parse(Some("SPAN")), ObservationType::Other);
        assert_eq!(ObservationType::parse(Some("EVENT")), ObservationType::Other);
        assert_eq!(ObservationType::parse(None), ObservationType::Other);
    }

    #[test]
    fn test_decode_langfuse_observation() {
        let obs: Observation = serde_json::from_value(json!({
            "id": "obs_generation",
            "name": "Generation: GPT-4o",
            "type": "GENERATION",
            "startTime": "2024-02-03T10:30:01.400Z",
            "endTime": "2024-02-03T10:30:03.400Z",
            "parentObservationId": "obs_root",
            "model": "gpt-4o",
            "usage": { "promptTokens": 500, "completionTokens": 700, "totalTokens": 1200 },
            "calculatedTotalCost": 0.0041,
            "input": { "messages": [] },
            "output": { "content": "ok" },
            "metadata": { "temperature": 0.2 }
        }))
        .unwrap();

        assert_eq!(obs.parent_observation_id.as_deref(), Some("obs_root"));
        assert_eq!(obs.observation_type(), ObservationType::Generation);
        assert_eq!(obs.total_tokens(), 1200);
        assert_eq!(obs.model.as_deref(), Some("gpt-4o"));
        assert_eq!(obs.extra["metadata"], json!({ "temperature": 0.2 }));
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let raw = json!({
            "id": "a",
            "type": "SPAN",
            "startTime": "2024-02-03T10:30:00.000Z",
            "metadata": { "k": "v" },
            "traceId": "t-1"
        });
        let obs: Observation = serde_json::from_value(raw).unwrap();
        let back = serde_json::to_value(&obs).unwrap();

        assert_eq!(back["metadata"], json!({ "k": "v" }));
        assert_eq!(back["traceId"], "t-1");
        assert_eq!(back["startTime"], "2024-02-03T10:30:00.000Z");
        assert!(back.get("parentObservationId").is_none());
    }

    #[test]
    fn test_null_parent_and_bad_timestamp_are_absent() {
        let obs: Observation = serde_json::from_value(json!({
            "id": "a",
            "parentObservationId": null,
            "startTime": "not a date",
            "endTime": null
        }))
        .unwrap();

        assert!(obs.parent_observation_id.is_none());
        assert!(obs.start_time.is_none());
        assert!(obs.end_time.is_none());
    }

    #[test]
    fn test_label_falls_back_to_type() {
        let named = Observation::new("a").with_name("Retrieval").with_kind("SPAN");
        assert_eq!(named.label(), "Retrieval");

        let unnamed = Observation::new("b").with_kind("TOOL");
        assert_eq!(unnamed.label(), "TOOL");

        let bare = Observation::new("c");
        assert_eq!(bare.label(), "span");
    }

    #[test]
    fn test_usage_aliases_and_total_fallback() {
        let usage: Usage = serde_json::from_value(json!({ "input": 10, "output": 5 })).unwrap();
        assert_eq!(usage.prompt_tokens, Some(10));
        assert_eq!(usage.total(), 15);
    }
}
