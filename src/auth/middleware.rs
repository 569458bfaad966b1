// Authorization guard for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::warn;

use crate::auth::{error::AuthError, token::Claims};
use crate::users::models::Role;
use crate::AppState;

/// Claims extracted from a validated bearer token
///
/// Per request the guard moves through: no token -> token present ->
/// valid/invalid. Absence or any invalid variant rejects with a uniform
/// 401; on success the claims ride into the handler through this extractor.
#[derive(Debug, Clone)]
pub struct AuthenticatedClaims(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedClaims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let endpoint = parts.uri.path().to_string();

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| {
                warn!("Missing Authorization header on protected endpoint: {}", endpoint);
                AuthError::MissingToken
            })?
            .to_str()
            .map_err(|_| AuthError::MissingToken)?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header without Bearer scheme on: {}", endpoint);
            AuthError::MissingToken
        })?;

        // Token service is injected through application state rather than
        // read from the environment per request.
        let state = AppState::from_ref(state);
        let claims = state.tokens.validate(token).map_err(|e| {
            warn!("Token rejected on {}: {:?}", endpoint, e);
            AuthError::from(e)
        })?;

        Ok(AuthenticatedClaims(claims))
    }
}

/// Require an exact role match
pub fn require_role(claims: &Claims, required: Role) -> Result<(), AuthError> {
    if claims.role == required {
        Ok(())
    } else {
        Err(AuthError::InsufficientRole {
            required,
            actual: claims.role,
        })
    }
}

/// Permit the record owner or any admin
pub fn require_self_or_admin(claims: &Claims, target_user_id: &str) -> Result<(), AuthError> {
    if claims.role == Role::Admin || claims.sub == target_user_id {
        Ok(())
    } else {
        Err(AuthError::NotResourceOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims_for(user_id: &str, role: Role) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: user_id.to_string(),
            email: "ann@x.com".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            role,
            iat: now,
            exp: now + 3600,
        }
    }

    #[test]
    fn require_role_matches_exactly() {
        let admin = claims_for("u-1", Role::Admin);
        let user = claims_for("u-2", Role::User);

        assert!(require_role(&admin, Role::Admin).is_ok());
        assert!(require_role(&user, Role::User).is_ok());

        match require_role(&user, Role::Admin) {
            Err(AuthError::InsufficientRole { required, actual }) => {
                assert_eq!(required, Role::Admin);
                assert_eq!(actual, Role::User);
            }
            other => panic!("expected InsufficientRole, got {:?}", other),
        }
    }

    #[test]
    fn self_or_admin_permits_owner_and_admin_only() {
        let owner = claims_for("u-1", Role::User);
        let admin = claims_for("u-9", Role::Admin);
        let stranger = claims_for("u-2", Role::User);

        assert!(require_self_or_admin(&owner, "u-1").is_ok());
        assert!(require_self_or_admin(&admin, "u-1").is_ok());
        assert!(matches!(
            require_self_or_admin(&stranger, "u-1"),
            Err(AuthError::NotResourceOwner)
        ));
    }
}
