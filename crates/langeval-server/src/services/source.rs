//! Upstream access to the resource service.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use langeval_config::{ServiceKind, UpstreamConfig};
use langeval_core::{TraceEnvelope, TraceError};
use reqwest::Url;
use serde_json::Value;

/// Pagination and filters forwarded to the trace list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceListQuery {
    pub limit: u32,
    pub offset: u32,
    pub agent_id: Option<String>,
    pub cursor: Option<String>,
}

impl TraceListQuery {
    /// Query pairs in upstream naming; empty filters are left out.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(agent_id) = self.agent_id.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("agent_id", agent_id.to_string()));
        }
        if let Some(cursor) = self.cursor.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("cursor", cursor.to_string()));
        }
        pairs
    }
}

/// A request to pass through to the resource service.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    /// Path below `/api/v1/resource/`.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Source of traces for the BFF.
#[async_trait]
pub trait TraceSource: Send + Sync {
    /// Raw trace list body from upstream.
    async fn list_traces(&self, query: &TraceListQuery) -> Result<Value, TraceError>;

    async fn get_trace(&self, trace_id: &str) -> Result<TraceEnvelope, TraceError>;

    async fn forward(&self, request: ProxyRequest) -> Result<ProxyResponse, TraceError>;
}

/// Headers that must not be copied onto the upstream request.
const SKIPPED_REQUEST_HEADERS: [&str; 2] = ["host", "connection"];

/// Hop-by-hop headers dropped from the upstream response.
const SKIPPED_RESPONSE_HEADERS: [&str; 3] = ["connection", "transfer-encoding", "content-length"];

pub fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    filter_headers(headers, &SKIPPED_REQUEST_HEADERS)
}

fn filter_headers(headers: &HeaderMap, skipped: &[&str]) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !skipped.contains(&name.as_str()) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// Splits a pass-through path into segments, rejecting `.` and `..`.
pub fn path_segments(path: &str) -> Result<Vec<&str>, TraceError> {
    let segments: Vec<&str> = path.split('/').collect();
    if let Some(bad) = segments.iter().find(|s| matches!(**s, "." | "..")) {
        return Err(TraceError::InvalidPath(bad.to_string()));
    }
    Ok(segments)
}

/// Appends `segments` to the path of `base`, percent-encoding each one.
fn join_segments<'a>(
    base: &str,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, TraceError> {
    let mut url = Url::parse(base)
        .map_err(|e| TraceError::Upstream(format!("Invalid upstream URL {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| TraceError::Upstream(format!("Upstream URL has no path: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// reqwest-backed [`TraceSource`].
pub struct HttpTraceSource {
    client: reqwest::Client,
    backend_url: String,
    resource_url: String,
}

impl HttpTraceSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, TraceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| TraceError::Upstream(e.to_string()))?;

        Ok(Self {
            client,
            backend_url: config.backend_url().to_string(),
            resource_url: config.service_url(ServiceKind::Resource),
        })
    }

    fn trace_list_url(&self) -> Result<Url, TraceError> {
        join_segments(&self.backend_url, ["resource", "traces"])
    }

    fn trace_url(&self, trace_id: &str) -> Result<Url, TraceError> {
        if matches!(trace_id, "" | "." | "..") {
            return Err(TraceError::InvalidPath(trace_id.to_string()));
        }
        join_segments(&self.backend_url, ["resource", "traces", trace_id])
    }

    fn proxy_url(&self, path: &str, query: Option<&str>) -> Result<Url, TraceError> {
        let segments = path_segments(path)?;
        let mut url = join_segments(
            &self.resource_url,
            ["api", "v1", "resource"].into_iter().chain(segments),
        )?;
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url, query: &[(&str, String)]) -> Result<Bytes, TraceError> {
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(%request_id, %url, "Fetching from resource service");

        let response = self
            .client
            .get(url)
            .query(query)
            .header("Content-Type", "application/json")
            .header("X-Request-Id", request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%request_id, "Upstream request failed: {}", e);
                TraceError::Upstream(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TraceError::Upstream(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%request_id, status = status.as_u16(), "Upstream returned error status");
            return Err(TraceError::UpstreamStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        tracing::debug!(%request_id, bytes = body.len(), "Upstream response received");
        Ok(body)
    }
}

#[async_trait]
impl TraceSource for HttpTraceSource {
    async fn list_traces(&self, query: &TraceListQuery) -> Result<Value, TraceError> {
        let body = self.get_json(self.trace_list_url()?, &query.to_pairs()).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_trace(&self, trace_id: &str) -> Result<TraceEnvelope, TraceError> {
        let body = self.get_json(self.trace_url(trace_id)?, &[]).await?;
        TraceEnvelope::from_slice(&body)
    }

    async fn forward(&self, request: ProxyRequest) -> Result<ProxyResponse, TraceError> {
        let request_id = uuid::Uuid::new_v4();
        let url = self.proxy_url(&request.path, request.query.as_deref())?;
        tracing::info!(%request_id, method = %request.method, url = %url, "Proxying request");

        let response = self
            .client
            .request(request.method, url)
            .headers(forwardable_headers(&request.headers))
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%request_id, "Proxy error: {}", e);
                TraceError::Upstream(e.to_string())
            })?;

        let status = response.status();
        let headers = filter_headers(response.headers(), &SKIPPED_RESPONSE_HEADERS);
        let body = response
            .bytes()
            .await
            .map_err(|e| TraceError::Upstream(e.to_string()))?;

        tracing::info!(%request_id, status = status.as_u16(), "Proxy response");
        Ok(ProxyResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_list_query_pairs() {
        let query = TraceListQuery {
            limit: 50,
            offset: 0,
            agent_id: Some("agent-7".into()),
            cursor: Some(String::new()),
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("limit", "50".to_string()),
                ("offset", "0".to_string()),
                ("agent_id", "agent-7".to_string()),
            ]
        );
    }

    #[test]
    fn test_forwardable_headers_drop_host_and_connection() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("localhost:3000"));
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("authorization", HeaderValue::from_static("Bearer t"));
        headers.append("x-tag", HeaderValue::from_static("a"));
        headers.append("x-tag", HeaderValue::from_static("b"));

        let out = forwardable_headers(&headers);
        assert!(out.get("host").is_none());
        assert!(out.get("connection").is_none());
        assert_eq!(out.get("authorization").unwrap(), "Bearer t");
        assert_eq!(out.get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn test_http_source_urls() {
        let config = UpstreamConfig {
            backend_url: "http://resource:8003/".into(),
            ..UpstreamConfig::default()
        };
        let source = HttpTraceSource::new(&config).unwrap();
        assert_eq!(source.backend_url, "http://resource:8003");
        assert_eq!(source.resource_url, "http://127.0.0.1:8003");
        assert_eq!(
            source.trace_list_url().unwrap().as_str(),
            "http://resource:8003/resource/traces"
        );
    }

    fn local_source() -> HttpTraceSource {
        HttpTraceSource::new(&UpstreamConfig::default()).unwrap()
    }

    #[test]
    fn test_trace_id_is_one_encoded_segment() {
        let source = local_source();
        assert_eq!(
            source.trace_url("x?admin=1").unwrap().as_str(),
            "http://localhost:8003/resource/traces/x%3Fadmin=1"
        );
        assert_eq!(
            source.trace_url("a/../../health").unwrap().as_str(),
            "http://localhost:8003/resource/traces/a%2F..%2F..%2Fhealth"
        );
        assert_eq!(
            source.trace_url("trc#1").unwrap().as_str(),
            "http://localhost:8003/resource/traces/trc%231"
        );
        assert!(matches!(source.trace_url(".."), Err(TraceError::InvalidPath(_))));
    }

    #[test]
    fn test_proxy_url_encodes_segments_and_keeps_query() {
        let source = local_source();
        let url = source.proxy_url("agents/x?y#z", Some("dry_run=true")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8003/api/v1/resource/agents/x%3Fy%23z?dry_run=true"
        );
        assert_eq!(url.query(), Some("dry_run=true"));

        let err = source.proxy_url("agents/../../health", None).unwrap_err();
        assert!(matches!(err, TraceError::InvalidPath(_)));
    }
}
