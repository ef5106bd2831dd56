//! Trace list, detail and view handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use langeval_core::TraceEnvelope;
use langeval_layout::TraceGraph;
use serde_json::Value;

use crate::dto::{GraphSvgQuery, ListTracesQuery, ObservationResponse, WaterfallResponse};
use crate::error::AppError;
use crate::services::{views, TraceListQuery};
use crate::ServerState;

const DEFAULT_LIMIT: u32 = 50;

/// GET /api/v1/resource/traces - Forward a paginated trace list.
pub async fn list(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ListTracesQuery>,
) -> Result<Json<Value>, AppError> {
    let query = TraceListQuery {
        limit: params.limit.unwrap_or(DEFAULT_LIMIT),
        offset: params.offset.unwrap_or(0),
        agent_id: params.agent_id,
        cursor: params.cursor,
    };

    let body = state.source.list_traces(&query).await.map_err(|e| {
        tracing::error!("Failed to list traces: {}", e);
        AppError::from(e)
    })?;

    let count = body
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    tracing::debug!(count, limit = query.limit, offset = query.offset, "Listed traces");

    Ok(Json(body))
}

/// GET /api/v1/resource/traces/{id} - Trace detail envelope.
pub async fn get(
    State(state): State<Arc<ServerState>>,
    Path(trace_id): Path<String>,
) -> Result<Json<TraceEnvelope>, AppError> {
    Ok(Json(views::load_trace(&state, &trace_id).await?))
}

/// GET /api/v1/resource/traces/{id}/graph - Laid-out nodes and edges.
pub async fn graph(
    State(state): State<Arc<ServerState>>,
    Path(trace_id): Path<String>,
) -> Result<Json<TraceGraph>, AppError> {
    let envelope = views::load_trace(&state, &trace_id).await?;
    Ok(Json(views::graph(&envelope, &state.config.layout)))
}

/// GET /api/v1/resource/traces/{id}/graph.svg - Rendered graph.
pub async fn graph_svg(
    State(state): State<Arc<ServerState>>,
    Path(trace_id): Path<String>,
    Query(params): Query<GraphSvgQuery>,
) -> Result<Response, AppError> {
    let envelope = views::load_trace(&state, &trace_id).await?;
    let svg = views::graph_svg(&envelope, &state.config.layout, &params)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

/// GET /api/v1/resource/traces/{id}/waterfall - Header summary and timeline rows.
pub async fn waterfall(
    State(state): State<Arc<ServerState>>,
    Path(trace_id): Path<String>,
) -> Result<Json<WaterfallResponse>, AppError> {
    let envelope = views::load_trace(&state, &trace_id).await?;
    Ok(Json(views::waterfall(&envelope)))
}

/// GET /api/v1/resource/traces/{id}/observations/{obs_id} - Detail panel and scores.
pub async fn observation(
    State(state): State<Arc<ServerState>>,
    Path((trace_id, observation_id)): Path<(String, String)>,
) -> Result<Json<ObservationResponse>, AppError> {
    let envelope = views::load_trace(&state, &trace_id).await?;
    Ok(Json(views::observation(&envelope, &observation_id)?))
}
