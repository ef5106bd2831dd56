//! HTTP route handlers for the trace BFF.

pub mod proxy;
pub mod traces;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
