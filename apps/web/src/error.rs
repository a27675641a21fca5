//! # Web Error Type
//!
//! Unified error type for handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bazaar                                 │
//! │                                                                         │
//! │  Form invalid?        → not an error: the form is re-rendered          │
//! │  Item id missing?     → not an error: redirect to the listing          │
//! │                                                                         │
//! │  DbError ─────────────┐                                                │
//! │  CoreError::Config ───┼──► WebError ──► IntoResponse                   │
//! │  io::Error (uploads) ─┘        │                                        │
//! │                                ├── logged with the real cause          │
//! │                                └── status + generic plain-text body    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bazaar_core::CoreError;
use bazaar_db::DbError;

/// Handler error.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Database failure (500).
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    /// Programming or deployment mistake (500).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upload could not be written or read (500).
    #[error("Upload storage error: {0}")]
    Upload(#[from] std::io::Error),

    /// Resource does not exist (404).
    #[error("Not found")]
    NotFound,

    /// Body over the configured cap (413).
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Malformed request (400).
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl WebError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Db(_) | WebError::Config(_) | WebError::Upload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Core errors reaching a handler are configuration mistakes; user input
/// problems travel as `FormErrors`.
impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        WebError::Config(err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log the actual error but return a generic message
        let body = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string()
        } else {
            tracing::warn!(error = %self, "Request rejected");
            self.to_string()
        };

        (status, body).into_response()
    }
}

/// Result type for handlers.
pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            WebError::from(DbError::QueryFailed("no such table".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            WebError::from(CoreError::config("bad column")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(WebError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(WebError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            WebError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let response = WebError::from(DbError::QueryFailed("secret detail".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
