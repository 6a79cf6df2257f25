use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use merchstat_core::{SourceError, SourceErrorKind, ValidationError};
use serde_json::json;
use thiserror::Error;

/// Request-level error categories mapped to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("customer metric requires both 'start' and 'end' query parameters")]
    MissingRange,

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, payload) = match &self {
            Self::Validation(_) | Self::MissingRange => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string() }),
            ),
            Self::Source(error) => match error.kind() {
                // upstream fetch failures surface the upstream status to the client
                SourceErrorKind::UpstreamStatus => (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "failed to fetch orders",
                        "status": error.upstream_status(),
                    }),
                ),
                SourceErrorKind::InvalidRequest => (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": error.to_string() }),
                ),
                SourceErrorKind::Unavailable => (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": error.to_string() }),
                ),
                SourceErrorKind::Internal => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error.to_string() }),
                ),
            },
        };

        (status, Json(payload)).into_response()
    }
}

/// Startup failures mapped to process exit codes.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("environment variable {name} must be set (or pass --demo)")]
    MissingEnv { name: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServeError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MissingEnv { .. } => 2,
            Self::Io(_) => 10,
        }
    }
}
