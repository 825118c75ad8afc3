// Error handling for the booking marketplace API
// Provides the crate-wide error type and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Main error type for the API
/// All services and handlers return Result<T, ApiError>
///
/// Each variant maps to a stable machine-readable error code and an HTTP
/// status. Storage and upstream details are logged but never exposed to
/// clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or out-of-range input
    /// Maps to HTTP 400 Bad Request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist
    /// Maps to HTTP 404 Not Found
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// Actor lacks permission for the requested mutation
    /// Maps to HTTP 403 Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Requested state change is not legal from the current state
    /// Maps to HTTP 409 Conflict
    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    /// External collaborator (identity store) timed out or failed
    /// Maps to HTTP 502 Bad Gateway
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Repository read/write failure
    /// Maps to HTTP 500 Internal Server Error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Penalty write failed after the triggering status change was already
    /// committed. Reported distinctly from Storage so callers can tell the
    /// booking state is durable even though the penalty was dropped.
    /// Maps to HTTP 500 Internal Server Error
    #[error("Penalty accrual failed: {0}")]
    PenaltyAccrual(String),
}

/// Consistent error response structure
///
/// JSON body returned for every error: a machine-readable code, a
/// human-readable message, and the time the error occurred.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging levels by severity:
    /// - debug: expected client errors (validation, not found, conflicts)
    /// - warn: security-relevant rejections (forbidden)
    /// - error: storage and upstream failures
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let (status, error_code, message) = match self {
            ApiError::Validation(msg) => {
                debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{} with id {} not found", resource, id),
                )
            }
            ApiError::Forbidden(msg) => {
                warn!("Forbidden access attempt: {}", msg);
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            ApiError::InvalidTransition(msg) => {
                debug!("Invalid transition: {}", msg);
                (StatusCode::CONFLICT, "INVALID_TRANSITION", msg.clone())
            }
            ApiError::UpstreamUnavailable(msg) => {
                error!("Upstream unavailable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    "An external collaborator is unavailable".to_string(),
                )
            }
            ApiError::Storage(msg) => {
                // Full detail stays in the logs, clients get a generic message
                error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            ApiError::PenaltyAccrual(msg) => {
                error!("Penalty accrual failed after committed transition: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PENALTY_ACCRUAL_FAILED",
                    "The status change was applied but the penalty could not be recorded"
                        .to_string(),
                )
            }
        };

        (
            status,
            ErrorResponse {
                error_code: error_code.to_string(),
                message,
                timestamp: Utc::now().to_rfc3339(),
            },
        )
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidTransition(_) => StatusCode::CONFLICT,
            ApiError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PenaltyAccrual(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert sqlx errors to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::Storage(error.to_string())
    }
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}
