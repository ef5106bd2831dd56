//! Generic pass-through to the resource service.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;

use crate::error::AppError;
use crate::services::{path_segments, ProxyRequest};
use crate::ServerState;

/// ANY /api/v1/resource/proxy/{*path} - Forward method, query, headers and body.
pub async fn forward(
    State(state): State<Arc<ServerState>>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    path_segments(&path)?;

    let request = ProxyRequest {
        method,
        path,
        query,
        headers,
        body,
    };

    let response = state.source.forward(request).await.map_err(|e| {
        tracing::error!("Proxy error: {}", e);
        AppError::Upstream("Internal Server Error".into())
    })?;

    let mut builder = Response::builder().status(response.status);
    if let Some(headers) = builder.headers_mut() {
        headers.extend(response.headers);
    }
    builder.body(Body::from(response.body)).map_err(AppError::internal)
}
