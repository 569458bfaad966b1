// Authentication service - business logic layer

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    models::{RefreshRequest, SignupRequest, TokenPairResponse},
    password::CredentialHasher,
    token::TokenService,
};
use crate::error::ApiError;
use crate::users::models::{NewUser, User};
use crate::users::repository::UserDirectory;
use crate::validation::RequestValidator;

/// Coordinates signup, login, and token refresh
///
/// All collaborators are injected at construction; there is no hidden
/// global state.
#[derive(Clone)]
pub struct AuthService {
    directory: UserDirectory,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
    validator: RequestValidator,
}

impl AuthService {
    pub fn new(
        directory: UserDirectory,
        hasher: CredentialHasher,
        tokens: Arc<TokenService>,
        validator: RequestValidator,
    ) -> Self {
        Self {
            directory,
            hasher,
            tokens,
            validator,
        }
    }

    /// Register a new user and return the generated identifier
    ///
    /// Validation runs first; the count pre-check short-circuits obvious
    /// duplicates, and the unique indexes catch the race it leaves open.
    pub async fn signup(&self, request: SignupRequest) -> Result<String, ApiError> {
        let valid = self.validator.validate_signup(&request)?;

        let existing = self
            .directory
            .exists_by_email_or_phone(&valid.email, &valid.phone)
            .await?;
        if existing > 0 {
            return Err(ApiError::Conflict {
                message: "This email or phone already exists".to_string(),
            });
        }

        let password_hash = self.hasher.hash(&valid.password)?;
        let user_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let (token, refresh_token) = self.tokens.issue_pair(
            &user_id,
            &valid.email,
            &valid.first_name,
            &valid.last_name,
            valid.role,
        )?;

        let record = NewUser {
            user_id,
            first_name: valid.first_name,
            last_name: valid.last_name,
            email: valid.email,
            phone: valid.phone,
            password_hash,
            user_type: valid.role,
            token,
            refresh_token,
            created_at: now,
            updated_at: now,
        };

        let user_id = self.directory.create(&record).await?;
        info!("Created user {}", user_id);
        Ok(user_id)
    }

    /// Authenticate by email and password, mint a fresh token pair, and
    /// return the updated record
    ///
    /// Unknown email and wrong password are indistinguishable to callers.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                debug!("Login attempt for unknown email");
                ApiError::from(AuthError::InvalidCredentials)
            })?;

        if !self.hasher.verify(password, &user.password_hash) {
            warn!("Password mismatch for user {}", user.user_id);
            return Err(AuthError::InvalidCredentials.into());
        }

        let (token, refresh_token) = self.tokens.issue_pair(
            &user.user_id,
            &user.email,
            &user.first_name,
            &user.last_name,
            user.user_type,
        )?;

        self.directory
            .update_tokens(&user.user_id, &token, &refresh_token)
            .await?;

        info!("User {} logged in", user.user_id);

        self.directory
            .find_by_id(&user.user_id)
            .await?
            .ok_or_else(|| {
                ApiError::Internal(format!(
                    "user {} disappeared after token update",
                    user.user_id
                ))
            })
    }

    /// Re-issue both tokens for the identity carried by a valid refresh
    /// token and persist the new pair (last-write-wins)
    pub async fn refresh(&self, request: RefreshRequest) -> Result<TokenPairResponse, ApiError> {
        let claims = self
            .tokens
            .validate(&request.refreshtoken)
            .map_err(AuthError::from)?;

        let user = self
            .directory
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                warn!("Refresh token for unknown user {}", claims.sub);
                ApiError::Unauthenticated
            })?;

        let (token, refresh_token) = self.tokens.issue_pair(
            &user.user_id,
            &user.email,
            &user.first_name,
            &user.last_name,
            user.user_type,
        )?;

        self.directory
            .update_tokens(&user.user_id, &token, &refresh_token)
            .await?;

        debug!("Rotated token pair for user {}", user.user_id);
        Ok(TokenPairResponse {
            token,
            refreshtoken: refresh_token,
        })
    }
}
