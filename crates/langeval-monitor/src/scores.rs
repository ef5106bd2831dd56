//! Evaluation scores attached to an observation.

use chrono::{DateTime, Utc};
use langeval_core::{Observation, Score, ScoreDataType};
use serde::Serialize;
use serde_json::Value;

pub const METRICS_SCORE_NAME: &str = "Evaluation Metrics";
pub const PASS_THRESHOLD: f64 = 0.7;
pub const WARN_THRESHOLD: f64 = 0.4;

/// Traffic-light verdict for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Pass,
    Warn,
    Fail,
    Error,
    Neutral,
}

/// A score ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreView {
    #[serde(flatten)]
    pub score: Score,
    pub has_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub grade: Grade,
    pub display_value: String,
}

impl ScoreView {
    pub fn new(score: Score) -> Self {
        Self::build(score, false, None)
    }

    fn build(score: Score, has_error: bool, status: Option<String>) -> Self {
        let grade = grade(&score, has_error);
        let display_value = format_value(&score, has_error);
        Self {
            score,
            has_error,
            status,
            grade,
            display_value,
        }
    }
}

pub fn grade(score: &Score, has_error: bool) -> Grade {
    if has_error {
        return Grade::Error;
    }
    match score.data_type {
        ScoreDataType::Boolean => {
            if score.value == Some(1.0) {
                Grade::Pass
            } else {
                Grade::Fail
            }
        }
        ScoreDataType::Numeric => match score.value {
            Some(v) if v >= PASS_THRESHOLD => Grade::Pass,
            Some(v) if v >= WARN_THRESHOLD => Grade::Warn,
            _ => Grade::Fail,
        },
        ScoreDataType::Categorical | ScoreDataType::Unknown => Grade::Neutral,
    }
}

pub fn format_value(score: &Score, has_error: bool) -> String {
    if has_error {
        return "Error".to_string();
    }
    match score.data_type {
        ScoreDataType::Boolean => {
            if score.value == Some(1.0) {
                "Pass".to_string()
            } else {
                "Fail".to_string()
            }
        }
        ScoreDataType::Numeric => score
            .value
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "N/A".to_string()),
        ScoreDataType::Categorical | ScoreDataType::Unknown => score
            .string_value
            .clone()
            .or_else(|| score.value.map(|v| v.to_string()))
            .unwrap_or_else(|| "N/A".to_string()),
    }
}

/// Score synthesized from an evaluator's `output.metrics` block.
fn metrics_score(obs: &Observation, now: DateTime<Utc>) -> Option<ScoreView> {
    let metrics = obs.output.get("metrics")?;
    if metrics.is_null() {
        return None;
    }

    let error = match metrics.get("error") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Null) | Some(Value::Bool(false)) | None => None,
        Some(Value::String(_)) => None,
        Some(other) => Some(other.to_string()),
    };
    let status = obs
        .output
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_string);

    let score = Score {
        id: Some(format!("metric-{}", obs.id)),
        name: METRICS_SCORE_NAME.to_string(),
        value: Some(metrics.get("score").and_then(Value::as_f64).unwrap_or(0.0)),
        data_type: ScoreDataType::Numeric,
        source: Some("EVAL".to_string()),
        timestamp: Some(obs.end_time.unwrap_or(now)),
        comment: error.clone(),
        observation_id: Some(obs.id.clone()),
        ..Score::default()
    };

    Some(ScoreView::build(score, error.is_some(), status))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Scores shown for one observation plus their tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub scores: Vec<ScoreView>,
    pub summary: ScoreSummary,
}

impl ScoreReport {
    pub fn for_observation(obs: &Observation) -> Self {
        Self::for_observation_at(obs, Utc::now())
    }

    /// Same as [`ScoreReport::for_observation`] with an explicit clock.
    pub fn for_observation_at(obs: &Observation, now: DateTime<Utc>) -> Self {
        let mut scores: Vec<ScoreView> = obs.scores.iter().cloned().map(ScoreView::new).collect();
        if let Some(metrics) = metrics_score(obs, now) {
            scores.push(metrics);
        }
        let summary = summarize(&scores);
        tracing::debug!(
            id = %obs.id,
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "Projected observation scores"
        );
        Self { scores, summary }
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Passed counts boolean passes; failed counts boolean failures and errors.
pub fn summarize(scores: &[ScoreView]) -> ScoreSummary {
    let is_bool = |s: &ScoreView| s.score.data_type == ScoreDataType::Boolean;
    ScoreSummary {
        total: scores.len(),
        passed: scores
            .iter()
            .filter(|s| is_bool(s) && s.score.value == Some(1.0))
            .count(),
        failed: scores
            .iter()
            .filter(|s| (is_bool(s) && s.score.value == Some(0.0)) || s.has_error)
            .count(),
    }
}
