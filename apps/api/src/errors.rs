use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::MatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Match(e) => match_error_parts(e),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

fn match_error_parts(e: &MatchError) -> (StatusCode, &'static str, String) {
    match e {
        MatchError::FileNotFound { .. } => (StatusCode::NOT_FOUND, "FILE_NOT_FOUND", e.to_string()),
        MatchError::UnsupportedFormat { .. } => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_FORMAT",
            e.to_string(),
        ),
        MatchError::DocumentParse { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "DOCUMENT_PARSE_ERROR",
            e.to_string(),
        ),
        MatchError::EmptyInput { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_INPUT", e.to_string())
        }
        MatchError::EmbeddingProvider(inner) => {
            tracing::error!("Embedding provider error: {inner}");
            (
                StatusCode::BAD_GATEWAY,
                "EMBEDDING_PROVIDER_ERROR",
                "The embedding provider request failed".to_string(),
            )
        }
        MatchError::DimensionMismatch { .. } | MatchError::DegenerateVector => {
            tracing::error!("Scoring error: {e}");
            (StatusCode::BAD_GATEWAY, "SCORING_ERROR", e.to_string())
        }
        MatchError::Io(_) | MatchError::InvalidThresholds(_) | MatchError::LoaderTask(_) => {
            tracing::error!("Match pipeline error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
