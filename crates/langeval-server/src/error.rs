//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use langeval_core::TraceError;
use serde::Serialize;

/// Application-level errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Creates an Internal error from any error type.
    pub fn internal(e: impl std::fmt::Display) -> Self {
        AppError::Internal(e.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TraceError> for AppError {
    fn from(e: TraceError) -> Self {
        match e {
            TraceError::NotFound(_) | TraceError::ObservationNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            TraceError::UpstreamStatus { status: 404, .. } => AppError::NotFound(e.to_string()),
            TraceError::InvalidPath(_) => AppError::BadRequest(e.to_string()),
            TraceError::Upstream(_) | TraceError::UpstreamStatus { .. } | TraceError::Parse(_) => {
                AppError::Upstream(e.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_error_mapping() {
        let not_found: AppError = TraceError::UpstreamStatus {
            status: 404,
            body: String::new(),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad_gateway: AppError = TraceError::UpstreamStatus {
            status: 503,
            body: "down".into(),
        }
        .into();
        assert_eq!(bad_gateway.status(), StatusCode::BAD_GATEWAY);

        let parse: AppError = TraceError::Parse("eof".into()).into();
        assert_eq!(parse.status(), StatusCode::BAD_GATEWAY);

        let missing: AppError = TraceError::ObservationNotFound("x".into()).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let bad_path: AppError = TraceError::InvalidPath("..".into()).into();
        assert_eq!(bad_path.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_keeps_message() {
        let err = AppError::internal("invalid header value");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "invalid header value");
    }
}
