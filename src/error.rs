// Central error taxonomy and HTTP response conversion
// Every handler returns Result<T, ApiError>; auth-layer errors fold in
// through From<AuthError> so the wire format stays uniform.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

use crate::auth::error::AuthError;

/// Main error type for the API
#[derive(Debug)]
pub enum ApiError {
    /// Request payload failed the declarative validation schema.
    /// Carries one message per failing field. Maps to HTTP 400.
    ValidationFailed(BTreeMap<String, String>),

    /// Duplicate email or phone. Maps to HTTP 409.
    Conflict { message: String },

    /// Missing or unacceptable credentials. Maps to HTTP 401 with a
    /// uniform body; the specific reason is only ever logged.
    Unauthenticated,

    /// Authenticated but not permitted. Maps to HTTP 403, uniform body.
    Forbidden,

    /// Resource lookup by identifier came up empty. Maps to HTTP 404.
    NotFound { resource: String, id: String },

    /// Database operation failure. Maps to HTTP 500; detail is logged,
    /// never sent to clients.
    Database(sqlx::Error),

    /// Any other internal failure (signing, hashing, timeout).
    /// Maps to HTTP 500 with a generic body.
    Internal(String),
}

/// Consistent error response structure
///
/// `error_code` is machine-stable; `message` is for humans; `details`
/// carries field-level validation messages when applicable.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::ValidationFailed(fields) => {
                debug!("Validation failed: {:?}", fields);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "VALIDATION_ERROR".to_string(),
                        message: "Request validation failed".to_string(),
                        details: Some(
                            serde_json::to_value(fields).unwrap_or(serde_json::json!({})),
                        ),
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::Conflict { message } => {
                warn!("Conflict: {}", message);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error_code: "CONFLICT".to_string(),
                        message: message.clone(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            // The external message is identical for every authentication
            // failure so a caller cannot probe which check rejected it.
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error_code: "UNAUTHENTICATED".to_string(),
                    message: "Authentication failed".to_string(),
                    details: None,
                    timestamp: Utc::now().to_rfc3339(),
                },
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    error_code: "FORBIDDEN".to_string(),
                    message: "Access denied".to_string(),
                    details: None,
                    timestamp: Utc::now().to_rfc3339(),
                },
            ),
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error_code: "NOT_FOUND".to_string(),
                        message: format!("{} with id {} not found", resource, id),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::Database(db_error) => {
                error!("Database error: {:?}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error_code: "DATABASE_ERROR".to_string(),
                        message: "A database error occurred".to_string(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::Internal(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error_code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred".to_string(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
        }
    }

    /// HTTP status code for this error, without building the full body
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::Database(error)
    }
}

/// Fold auth-layer errors into the taxonomy. The specific reason is logged
/// here; the client only ever sees the collapsed kind.
impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match &error {
            AuthError::MissingToken
            | AuthError::TokenMalformed
            | AuthError::TokenSignatureMismatch
            | AuthError::TokenExpired
            | AuthError::InvalidCredentials => {
                warn!("Authentication rejected: {}", error);
                ApiError::Unauthenticated
            }
            AuthError::InsufficientRole { .. } | AuthError::NotResourceOwner => {
                warn!("Authorization rejected: {}", error);
                ApiError::Forbidden
            }
            AuthError::PasswordHash | AuthError::TokenGeneration(_) => {
                ApiError::Internal(error.to_string())
            }
        }
    }
}
