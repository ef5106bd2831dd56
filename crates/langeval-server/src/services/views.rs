//! Trace views computed per request from the upstream envelope.

use langeval_config::LayoutConfig;
use langeval_core::{Observation, TraceEnvelope, TraceError};
use langeval_layout::{build_graph, build_waterfall, TraceGraph};
use langeval_monitor::{ScoreReport, TraceSummary};
use langeval_render::{DetailPanel, TraceFlowGraph};

use crate::dto::{GraphSvgQuery, ObservationResponse, WaterfallResponse};
use crate::error::AppError;
use crate::ServerState;

pub async fn load_trace(state: &ServerState, trace_id: &str) -> Result<TraceEnvelope, AppError> {
    let envelope = state.source.get_trace(trace_id).await.map_err(|e| {
        tracing::warn!(trace_id, "Failed to load trace: {}", e);
        AppError::from(e)
    })?;
    tracing::debug!(
        trace_id,
        observations = envelope.data.observations.len(),
        source = envelope.source.as_str(),
        "Loaded trace"
    );
    Ok(envelope)
}

pub fn graph(envelope: &TraceEnvelope, layout: &LayoutConfig) -> TraceGraph {
    build_graph(&envelope.data.observations, layout)
}

pub fn graph_svg(
    envelope: &TraceEnvelope,
    layout: &LayoutConfig,
    query: &GraphSvgQuery,
) -> Result<String, AppError> {
    let mut canvas =
        TraceFlowGraph::with_config(&envelope.data.observations, *layout, |_: &Observation| {});

    let width = positive(query.width, "width")?;
    let height = positive(query.height, "height")?;
    if width.is_some() || height.is_some() {
        let vp = *canvas.viewport();
        canvas.resize(width.unwrap_or(vp.width), height.unwrap_or(vp.height));
        canvas.fit_view();
    }

    let pan_x = query.pan_x.unwrap_or(0.0);
    let pan_y = query.pan_y.unwrap_or(0.0);
    if !pan_x.is_finite() || !pan_y.is_finite() {
        return Err(AppError::BadRequest("panX and panY must be finite".into()));
    }

    match positive(query.zoom, "zoom")? {
        Some(zoom) => {
            let vp = canvas.viewport_mut();
            vp.set_zoom(zoom);
            vp.pan_x = pan_x;
            vp.pan_y = pan_y;
        }
        None => canvas.pan_by(pan_x, pan_y),
    }

    Ok(canvas.render(query.selected.as_deref()))
}

fn positive(value: Option<f64>, name: &str) -> Result<Option<f64>, AppError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => {
            Err(AppError::BadRequest(format!("{name} must be a positive number")))
        }
        other => Ok(other),
    }
}

pub fn waterfall(envelope: &TraceEnvelope) -> WaterfallResponse {
    WaterfallResponse {
        summary: TraceSummary::from_envelope(envelope),
        waterfall: build_waterfall(&envelope.data.observations, envelope.data.latency),
    }
}

pub fn observation(
    envelope: &TraceEnvelope,
    observation_id: &str,
) -> Result<ObservationResponse, AppError> {
    let obs = envelope
        .data
        .observation(observation_id)
        .ok_or_else(|| TraceError::ObservationNotFound(observation_id.to_string()))?;

    Ok(ObservationResponse {
        detail: DetailPanel::from_observation(obs),
        scores: ScoreReport::for_observation(obs),
    })
}
