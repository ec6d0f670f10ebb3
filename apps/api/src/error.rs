//! API error handling.
//!
//! Maps storage and validation errors to HTTP responses. Every error
//! body has the shape `{"error": "<message>"}`.
//!
//! Internal failures never leak driver details to the client: each
//! endpoint supplies a fixed fallback message ("failed to fetch
//! products" and friends) and the real cause goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use mercado_core::ValidationError;
use mercado_db::DbError;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Maps a storage error, using `fallback` as the client-facing
    /// message for anything that is not a not-found or a conflict.
    pub fn from_db(err: DbError, fallback: &str) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::not_found(format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field } => {
                ApiError::conflict(format!("{} already exists", field))
            }
            DbError::ForeignKeyViolation { .. } => {
                ApiError::bad_request("referenced record does not exist")
            }
            other => {
                error!(error = %other, "Storage error");
                ApiError::internal(fallback)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
