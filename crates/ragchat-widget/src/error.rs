//! API error types and JSON error response formatting.
//!
//! Every non-2xx response from the widget server carries the same
//! `{error, message}` body. Backend failures are not errors here: they come
//! back as rendered entries with a 200.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ragchat_chat::ChatError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "conflict").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - empty question or unusable body.
    BadRequest(String),
    /// 409 Conflict - an exchange is already in flight.
    Conflict(String),
    /// 500 Internal Server Error - unexpected server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(_) => ApiError::BadRequest(err.to_string()),
            ChatError::Busy => ApiError::Conflict(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_chat::{Phase, ValidationError};

    #[test]
    fn test_chat_error_mapping() {
        assert!(matches!(
            ApiError::from(ChatError::Validation(ValidationError::EmptyInput)),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(ApiError::from(ChatError::Busy), ApiError::Conflict(_)));
        assert!(matches!(
            ApiError::from(ChatError::InvalidTransition {
                from: Phase::Idle,
                to: Phase::Idle
            }),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
