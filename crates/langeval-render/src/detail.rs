//! Detail panel projection of a selected observation.

use langeval_core::{timestamp, Observation};
use langeval_layout::derive;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRow {
    pub label: &'static str,
    pub value: String,
}

impl MetadataRow {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// What the side panel shows for one observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPanel {
    pub id: String,
    pub title: String,
    pub input_json: String,
    pub output_json: String,
    pub metadata: Vec<MetadataRow>,
}

impl DetailPanel {
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            id: obs.id.clone(),
            title: obs.label(),
            input_json: pretty_json(&obs.input),
            output_json: pretty_json(&obs.output),
            metadata: metadata_rows(obs),
        }
    }

    pub fn row(&self, label: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Metadata rows in display order. Optional rows are left out when empty.
pub fn metadata_rows(obs: &Observation) -> Vec<MetadataRow> {
    let mut rows = vec![
        MetadataRow::new("Type", obs.kind.clone().unwrap_or_else(|| "span".to_string())),
        MetadataRow::new("Duration", format!("{:.3}s", derive::duration_seconds(obs))),
    ];

    if let Some(usage) = &obs.usage {
        let counts = [
            ("Prompt Tokens", usage.prompt_tokens),
            ("Completion Tokens", usage.completion_tokens),
            ("Total Tokens", usage.total_tokens),
        ];
        for (label, count) in counts {
            if let Some(n) = count.filter(|n| *n > 0) {
                rows.push(MetadataRow::new(label, n.to_string()));
            }
        }
    }

    if let Some(cost) = obs.calculated_total_cost.filter(|c| *c > 0.0) {
        rows.push(MetadataRow::new("Cost", format!("${cost:.6}")));
    }
    if let Some(model) = obs.model.as_deref().filter(|m| !m.is_empty()) {
        rows.push(MetadataRow::new("Model", model));
    }
    if let Some(start) = &obs.start_time {
        rows.push(MetadataRow::new("Start", timestamp::format(start)));
    }
    if let Some(end) = &obs.end_time {
        rows.push(MetadataRow::new("End", timestamp::format(end)));
    }
    if let Some(level) = obs.level.as_ref().and_then(level_text) {
        rows.push(MetadataRow::new("Level", level));
    }
    if let Some(status) = obs.status_message.as_deref().filter(|s| !s.is_empty()) {
        rows.push(MetadataRow::new("Status", status));
    }

    rows
}

fn level_text(level: &Value) -> Option<String> {
    match level {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
