use langeval_layout::Waterfall;
use langeval_monitor::{ScoreReport, TraceSummary};
use langeval_render::DetailPanel;
use serde::{Deserialize, Serialize};

// === Query parameters ===

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTracesQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub agent_id: Option<String>,
    pub cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSvgQuery {
    pub selected: Option<String>,
    pub zoom: Option<f64>,
    pub pan_x: Option<f64>,
    pub pan_y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

// === Responses ===

#[derive(Debug, Serialize)]
pub struct WaterfallResponse {
    pub summary: TraceSummary,
    #[serde(flatten)]
    pub waterfall: Waterfall,
}

#[derive(Debug, Serialize)]
pub struct ObservationResponse {
    pub detail: DetailPanel,
    pub scores: ScoreReport,
}
