//! Application error type mapping to HTTP status codes and the envelope
//! format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ease_types::error::{HistoryError, SessionError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Conversation state machine errors.
    Session(SessionError),
    /// History store errors.
    History(HistoryError),
    /// Missing or unusable user identity.
    Unauthorized(String),
    /// Unknown session id.
    SessionNotFound,
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<HistoryError> for AppError {
    fn from(e: HistoryError) -> Self {
        AppError::History(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Session(SessionError::EmptyMessage) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Message text is empty".to_string(),
            ),
            AppError::Session(SessionError::ResponseInFlight) => (
                StatusCode::CONFLICT,
                "RESPONSE_IN_FLIGHT",
                "A response is already pending for this session".to_string(),
            ),
            AppError::Session(SessionError::GenerationTimeout(ms)) => (
                StatusCode::GATEWAY_TIMEOUT,
                "GENERATION_TIMEOUT",
                format!("No response within {ms}ms; please try again"),
            ),
            AppError::Session(SessionError::Cancelled) => (
                StatusCode::CONFLICT,
                "SESSION_CANCELLED",
                "The pending response was discarded".to_string(),
            ),
            AppError::Session(SessionError::PlaybackInProgress) => (
                StatusCode::CONFLICT,
                "PLAYBACK_IN_PROGRESS",
                "Voice controls are disabled during playback".to_string(),
            ),
            AppError::Session(e @ SessionError::Generator(_)) => {
                (StatusCode::BAD_GATEWAY, "GENERATOR_ERROR", e.to_string())
            }
            AppError::History(HistoryError::NotFound) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
            AppError::History(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "HISTORY_ERROR",
                e.to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
        };

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
