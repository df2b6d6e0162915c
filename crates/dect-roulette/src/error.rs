//! Error types for the roulette service.

use crate::api::RegisterView;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Roulette error types.
#[derive(Debug, Error)]
pub enum RouletteError {
    #[error("invalid DECT number given")]
    InvalidNumber(String),

    #[error("DECT number out of range")]
    OutOfRange(i64),

    #[error("this DECT number has been banned")]
    Banned(u32),

    #[error("Invalid admin token")]
    InvalidAdminToken,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl RouletteError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            RouletteError::InvalidNumber(_) => (StatusCode::BAD_REQUEST, "INVALID_NUMBER"),
            RouletteError::OutOfRange(_) => (StatusCode::BAD_REQUEST, "OUT_OF_RANGE"),
            RouletteError::Banned(_) => (StatusCode::FORBIDDEN, "BANNED"),
            RouletteError::InvalidAdminToken => (StatusCode::UNAUTHORIZED, "INVALID_ADMIN_TOKEN"),
            RouletteError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            RouletteError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }
}

/// User-facing errors re-render the registration view with an inline message.
impl IntoResponse for RouletteError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = RegisterView::with_error(self.to_string(), code);

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for RouletteError {
    fn from(e: std::io::Error) -> Self {
        RouletteError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for RouletteError {
    fn from(e: serde_json::Error) -> Self {
        RouletteError::Storage(format!("JSON serialization error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            RouletteError::InvalidNumber("abc".into()).to_string(),
            "invalid DECT number given"
        );
        assert_eq!(RouletteError::OutOfRange(0).to_string(), "DECT number out of range");
        assert_eq!(
            RouletteError::Banned(2000).to_string(),
            "this DECT number has been banned"
        );
        assert_eq!(RouletteError::InvalidAdminToken.to_string(), "Invalid admin token");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RouletteError::OutOfRange(100_000).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RouletteError::Banned(1).status_and_code().0, StatusCode::FORBIDDEN);
        assert_eq!(
            RouletteError::InvalidAdminToken.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RouletteError::Storage("disk full".into()).status_and_code().1,
            "STORAGE_ERROR"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: RouletteError = io.into();
        assert!(matches!(err, RouletteError::Storage(_)));
    }
}
