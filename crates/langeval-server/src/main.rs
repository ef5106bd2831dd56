mod dto;
mod error;
mod handlers;
mod services;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{any, get};
use axum::Router;
use langeval_config::ViewerConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::services::{HttpTraceSource, TraceSource};

pub struct ServerState {
    pub config: ViewerConfig,
    pub source: Arc<dyn TraceSource>,
}

fn app(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/api/v1/resource/traces", get(handlers::traces::list))
        .route("/api/v1/resource/traces/{id}", get(handlers::traces::get))
        .route("/api/v1/resource/traces/{id}/graph", get(handlers::traces::graph))
        .route(
            "/api/v1/resource/traces/{id}/graph.svg",
            get(handlers::traces::graph_svg),
        )
        .route(
            "/api/v1/resource/traces/{id}/waterfall",
            get(handlers::traces::waterfall),
        )
        .route(
            "/api/v1/resource/traces/{id}/observations/{obs_id}",
            get(handlers::traces::observation),
        )
        .route(
            "/api/v1/resource/proxy/{*path}",
            any(handlers::proxy::forward),
        )
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .compact()
        .init();

    let config = ViewerConfig::from_env()?;
    info!(
        backend = %config.upstream.backend_url(),
        timeout_secs = config.upstream.timeout_secs,
        "Resource service configured"
    );

    let source = HttpTraceSource::new(&config.upstream)?;
    let addr = config.server.bind_addr.clone();
    let state = Arc::new(ServerState {
        config,
        source: Arc::new(source),
    });

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod test_support {
    use std::sync::Arc;

    use axum::response::Response;
    use axum::Router;
    use langeval_config::ViewerConfig;
    use serde_json::Value;

    use crate::services::memory::InMemoryTraceSource;
    use crate::ServerState;

    pub fn test_app(source: InMemoryTraceSource) -> (Router, Arc<InMemoryTraceSource>) {
        let source = Arc::new(source);
        let state = Arc::new(ServerState {
            config: ViewerConfig::default(),
            source: source.clone(),
        });
        (crate::app(state), source)
    }

    pub async fn body_text(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub async fn body_json(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
