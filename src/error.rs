// src/error.rs

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{
    engine::{AssemblyError, ScoreError},
    services::{extractor::ExtractionError, generator::GenerationError},
};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden (e.g., editing someone else's quiz)
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate username)
    Conflict(String),

    // 422 Unprocessable Entity (input was fine, nothing usable came out of it)
    Unprocessable(String),

    // 502 Bad Gateway (text generation or extraction failed)
    Upstream(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Question generation service is unavailable".to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<AssemblyError> for AppError {
    fn from(err: AssemblyError) -> Self {
        AppError::Unprocessable(err.to_string())
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn status_and_message(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, body["error"].as_str().unwrap_or_default().to_string())
    }

    #[tokio::test]
    async fn test_empty_quiz_is_bad_request() {
        let (status, msg) = status_and_message(ScoreError::EmptyQuiz(12).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "quiz 12 has no questions to score");
    }

    #[tokio::test]
    async fn test_no_valid_questions_is_unprocessable() {
        let err = AssemblyError::NoValidQuestions {
            rejected: Vec::new(),
            malformed: Vec::new(),
        };
        let (status, msg) = status_and_message(err.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(msg, "could not generate questions from this material");
    }

    #[tokio::test]
    async fn test_generation_failure_is_masked() {
        let (status, msg) = status_and_message(GenerationError::NotConfigured.into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(msg, "Question generation service is unavailable");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err = AppError::InternalServerError("connection refused".to_string());
        let (status, msg) = status_and_message(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Internal Server Error");
    }
}
