//! Unified error handling
//!
//! Provides the application error type and the response envelope used by
//! every handler:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! Validation failures that touch several fields at once (product creation
//! validates every color variant before rejecting) carry the full message
//! list in `details` so the client can show them per field.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API response structure
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 on success)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Per-field detail messages (validation only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication (4xx) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // ========== Business logic (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Aggregated validation failures, one message per offending field.
    #[error("Validation failed ({} errors)", .0.len())]
    ValidationErrors(Vec<String>),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    // ========== System (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    /// Asset store upload failure. Delete failures are never surfaced
    /// through this type; they are logged inside the cleanup path.
    #[error("Asset store error: {0}")]
    AssetStore(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;

        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "E3001",
                "Please login first".to_string(),
            ),
            AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "E3003", "Token expired".to_string())
            }
            AppError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "E3002", msg.clone()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::ValidationErrors(errors) => {
                details = Some(errors.clone());
                (
                    StatusCode::BAD_REQUEST,
                    "E0002",
                    "Validation failed".to_string(),
                )
            }

            // Throttled (429)
            AppError::TooManyRequests(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "E0007", msg.clone())
            }

            // Database errors (500) - detail logged, generic message returned
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }

            // Asset store errors (502) - detail logged, generic message returned
            AppError::AssetStore(msg) => {
                error!(target: "assets", error = %msg, "Asset store error occurred");
                (
                    StatusCode::BAD_GATEWAY,
                    "E9003",
                    "Asset store error".to_string(),
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
            details,
        });

        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Multipart error: {}", e))
    }
}

impl From<crate::assets::AssetError> for AppError {
    fn from(e: crate::assets::AssetError) -> Self {
        AppError::AssetStore(e.to_string())
    }
}

impl From<crate::db::repository::RepoError> for AppError {
    fn from(e: crate::db::repository::RepoError) -> Self {
        use crate::db::repository::RepoError;
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

// ========== Helper constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
        details: None,
    })
}

/// Create a successful response with a custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
        details: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let Json(response) = ok(serde_json::json!({"name": "Heritage"}));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["code"], "E0000");
        assert_eq!(value["message"], "Success");
        assert_eq!(value["data"]["name"], "Heritage");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn validation_errors_carry_details() {
        let errors = vec!["colors[0]: name is required".to_string()];
        let err = AppError::ValidationErrors(errors.clone());
        assert_eq!(err.to_string(), "Validation failed (1 errors)");
    }
}
