//! Trace-detail payload returned by the resource service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::observation::Observation;
use crate::TraceError;

/// A trace with its flat observation list.
///
/// Header fields are optional upstream; unknown fields pass through in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub observations: Vec<Observation>,
    /// End-to-end latency in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TraceDetail {
    pub fn observation(&self, id: &str) -> Option<&Observation> {
        self.observations.iter().find(|o| o.id == id)
    }
}

/// Where a trace payload came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    Live,
    Langfuse,
    Mock,
    #[default]
    Unknown,
    Other(String),
}

impl DataSource {
    /// True for payloads served by a real tracing backend.
    pub fn is_live(&self) -> bool {
        matches!(self, DataSource::Live | DataSource::Langfuse)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DataSource::Live => "live",
            DataSource::Langfuse => "langfuse",
            DataSource::Mock => "mock",
            DataSource::Unknown => "unknown",
            DataSource::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for DataSource {
    fn from(s: String) -> Self {
        match s.as_str() {
            "live" => DataSource::Live,
            "langfuse" => DataSource::Langfuse,
            "mock" => DataSource::Mock,
            "unknown" | "" => DataSource::Unknown,
            _ => DataSource::Other(s),
        }
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.as_str().to_string()
    }
}

/// Response envelope: `{ data, source }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceEnvelope {
    pub data: TraceDetail,
    #[serde(default)]
    pub source: DataSource,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TraceEnvelope {
    pub fn from_json(raw: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_slice(raw: &[u8]) -> Result<Self, TraceError> {
        Ok(serde_json::from_slice(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_passthrough() {
        let raw = json!({
            "data": {
                "id": "trc_001",
                "name": "chat-rag-pipeline",
                "timestamp": "2024-02-03T10:30:00Z",
                "latency": 3.45,
                "totalCost": 0.0042,
                "status": "success",
                "observations": [
                    { "id": "obs_root", "type": "SPAN", "startTime": "2024-02-03T10:30:00.000Z" }
                ]
            },
            "source": "langfuse"
        });

        let envelope: TraceEnvelope = serde_json::from_value(raw).unwrap();
        assert_eq!(envelope.source, DataSource::Langfuse);
        assert_eq!(envelope.data.latency, Some(3.45));
        assert_eq!(envelope.data.observations.len(), 1);

        let back = serde_json::to_value(&envelope).unwrap();
        assert_eq!(back["source"], "langfuse");
        assert_eq!(back["data"]["timestamp"], "2024-02-03T10:30:00Z");
        assert_eq!(back["data"]["totalCost"], 0.0042);
    }

    #[test]
    fn test_data_source_strings() {
        assert!(DataSource::from("live".to_string()).is_live());
        assert!(!DataSource::from("mock".to_string()).is_live());
        assert_eq!(
            DataSource::from("replay".to_string()),
            DataSource::Other("replay".to_string())
        );
    }

    #[test]
    fn test_malformed_payload_is_parse_error() {
        let err = TraceEnvelope::from_json("{\"data\": 3}").unwrap_err();
        assert!(matches!(err, TraceError::Parse(_)));
    }

    #[test]
    fn test_missing_source_is_unknown() {
        let envelope = TraceEnvelope::from_json("{\"data\": {}}").unwrap();
        assert_eq!(envelope.source, DataSource::Unknown);
        assert!(envelope.data.observations.is_empty());
    }
}
