// Authentication and authorization error types

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::users::models::Role;

/// Fine-grained auth failure kinds
///
/// These exist so logs and callers can distinguish why a token or check was
/// rejected; the HTTP response collapses them into uniform 401/403 bodies
/// (see `From<AuthError> for ApiError`).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no bearer token on the request")]
    MissingToken,

    #[error("token is not a well-formed JWT")]
    TokenMalformed,

    #[error("token signature does not match the signing secret")]
    TokenSignatureMismatch,

    #[error("token has expired")]
    TokenExpired,

    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("required role '{required}', but claims carry role '{actual}'")]
    InsufficientRole { required: Role, actual: Role },

    #[error("requester is neither the record owner nor an admin")]
    NotResourceOwner,

    #[error("password hashing failed")]
    PasswordHash,

    #[error("token generation failed: {0}")]
    TokenGeneration(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Single conversion point keeps the wire format identical whether an
        // auth error escapes from an extractor or from a handler.
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn extractor_rejections_share_the_handler_wire_format() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InsufficientRole {
            required: Role::Admin,
            actual: Role::User,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
