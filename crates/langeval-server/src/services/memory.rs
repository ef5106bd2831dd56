//! In-memory trace source for handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use langeval_core::{TraceEnvelope, TraceError};
use serde_json::{json, Value};

use super::source::{ProxyRequest, ProxyResponse, TraceListQuery, TraceSource};

#[derive(Default)]
pub struct InMemoryTraceSource {
    traces: HashMap<String, TraceEnvelope>,
    /// Answers `list_traces` and `forward` with an upstream failure.
    pub fail_upstream: bool,
    pub last_list_query: Mutex<Option<TraceListQuery>>,
    pub last_forward: Mutex<Option<ProxyRequest>>,
}

impl InMemoryTraceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(mut self, id: &str, envelope: TraceEnvelope) -> Self {
        self.traces.insert(id.to_string(), envelope);
        self
    }
}

#[async_trait]
impl TraceSource for InMemoryTraceSource {
    async fn list_traces(&self, query: &TraceListQuery) -> Result<Value, TraceError> {
        if self.fail_upstream {
            return Err(TraceError::Upstream("connection refused".into()));
        }
        if let Ok(mut last) = self.last_list_query.lock() {
            *last = Some(query.clone());
        }
        let mut ids: Vec<&String> = self.traces.keys().collect();
        ids.sort();
        Ok(json!({ "data": ids, "total": ids.len() }))
    }

    async fn get_trace(&self, trace_id: &str) -> Result<TraceEnvelope, TraceError> {
        self.traces
            .get(trace_id)
            .cloned()
            .ok_or_else(|| TraceError::UpstreamStatus {
                status: 404,
                body: format!("trace {trace_id} not found"),
            })
    }

    async fn forward(&self, request: ProxyRequest) -> Result<ProxyResponse, TraceError> {
        if self.fail_upstream {
            return Err(TraceError::Upstream("connection refused".into()));
        }
        let echo = json!({
            "method": request.method.as_str(),
            "path": &request.path,
            "query": &request.query,
            "body": String::from_utf8_lossy(&request.body),
        });
        if let Ok(mut last) = self.last_forward.lock() {
            *last = Some(request);
        }

        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        Ok(ProxyResponse {
            status: StatusCode::CREATED,
            headers,
            body: Bytes::from(echo.to_string()),
        })
    }
}
