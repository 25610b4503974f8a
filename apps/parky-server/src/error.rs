//! # API Error Type
//!
//! Maps core and store errors onto HTTP responses.
//!
//! ```text
//! DbError::NotFound        → 404 {"error": "Cannot find a ticket with ID: 7"}
//! DbError::AlreadyPaid     → 409 {"error": "Ticket 7 has already been paid"}
//! CoreError::InvalidTicketId → 400 {"error": "Invalid ticket id: abc"}
//! missing or bad JSON body → 400 {"error": "Invalid payment request: ..."}
//! anything else            → 500 {"error": "internal server error"}
//! ```
//!
//! Internal error text is logged, never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parky_core::CoreError;
use parky_db::DbError;
use serde::Serialize;
use tracing::error;

/// Error returned from HTTP handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal() -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            DbError::AlreadyPaid { .. } => ApiError::new(StatusCode::CONFLICT, err.to_string()),
            other => {
                error!(error = %other, "Ticket store operation failed");
                ApiError::internal()
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTicketId(_) => ApiError::bad_request(err.to_string()),
            CoreError::AlreadyPaid(_) => ApiError::new(StatusCode::CONFLICT, err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.message,
        });
        (self.status, body).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_keeps_message() {
        let err = ApiError::from(DbError::not_found(12));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Cannot find a ticket with ID: 12");
    }

    #[test]
    fn test_store_failures_are_generic() {
        let err = ApiError::from(DbError::TransactionFailed("disk I/O error".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("disk"));
    }

    #[test]
    fn test_already_paid_is_conflict() {
        let err = ApiError::from(DbError::AlreadyPaid { id: 3 });
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_id_is_bad_request() {
        let err = ApiError::from(CoreError::InvalidTicketId("abc".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid ticket id: abc");
    }
}
