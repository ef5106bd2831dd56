//! Timeline rows for the execution-path view.

use chrono::{DateTime, Utc};
use langeval_core::Observation;
use serde::{Deserialize, Serialize};

use crate::derive;
use crate::tree::TraceForest;

/// Narrowest bar drawn, in percent of the timeline.
pub const MIN_BAR_WIDTH_PCT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarColor {
    Blue,
    Orange,
    Slate,
}

impl BarColor {
    pub fn for_type(type_label: &str) -> Self {
        match type_label {
            "generation" => BarColor::Blue,
            "tool" => BarColor::Orange,
            _ => BarColor::Slate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallRow {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub depth: usize,
    /// Seconds.
    pub duration: f64,
    pub tokens: u64,
    pub cost: f64,
    pub offset_pct: f64,
    pub width_pct: f64,
    pub color: BarColor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waterfall {
    /// Seconds spanned by the timeline.
    pub total_duration: f64,
    pub rows: Vec<WaterfallRow>,
}

/// Timeline length: the trace latency when positive, else the longest span.
pub fn total_duration(observations: &[Observation], latency: Option<f64>) -> f64 {
    match latency {
        Some(l) if l.is_finite() && l > 0.0 => l,
        _ => observations
            .iter()
            .map(derive::duration_seconds)
            .fold(0.0, f64::max),
    }
}

/// One row per observation in depth-first pre-order.
pub fn build_waterfall(observations: &[Observation], latency: Option<f64>) -> Waterfall {
    let forest = TraceForest::build(observations);
    let total = total_duration(observations, latency);
    let origin: Option<DateTime<Utc>> = forest
        .nodes()
        .first()
        .and_then(|n| n.observation.start_time);

    let rows = forest
        .preorder()
        .into_iter()
        .map(|(index, depth)| {
            let obs = forest.node(index).observation;
            let duration = derive::duration_seconds(obs);
            let kind = obs.type_label();

            let (offset_pct, width_pct) = if total > 0.0 {
                let offset = match (origin, obs.start_time) {
                    (Some(o), Some(s)) => (s - o).num_milliseconds() as f64 / 1000.0 / total * 100.0,
                    _ => 0.0,
                };
                (offset, (duration / total * 100.0).max(MIN_BAR_WIDTH_PCT))
            } else {
                (0.0, MIN_BAR_WIDTH_PCT)
            };

            WaterfallRow {
                id: obs.id.clone(),
                name: obs.label(),
                color: BarColor::for_type(&kind),
                kind,
                depth,
                duration,
                tokens: obs.total_tokens(),
                cost: derive::cost(obs),
                offset_pct,
                width_pct,
            }
        })
        .collect();

    Waterfall {
        total_duration: total,
        rows,
    }
}
