// JWT token generation and validation service

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::users::models::Role;

/// Session tokens live for 24 hours, refresh tokens for 7 days.
/// Invariant: session expiry is strictly shorter than refresh expiry.
const SESSION_TTL_SECS: i64 = 86_400;
const REFRESH_TTL_SECS: i64 = 604_800;

/// Identity claims embedded in both token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier
    pub sub: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Why a token failed validation
///
/// Callers get the distinct kind for diagnostics; the HTTP-facing message
/// stays uniform regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    SignatureMismatch,
    Expired,
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AuthError::TokenMalformed,
            TokenError::SignatureMismatch => AuthError::TokenSignatureMismatch,
            TokenError::Expired => AuthError::TokenExpired,
        }
    }
}

/// Issues and validates signed session/refresh token pairs
///
/// Holds the process-wide signing secret, injected once at startup and
/// never rotated at runtime.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    session_ttl: i64,
    refresh_ttl: i64,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl: SESSION_TTL_SECS,
            refresh_ttl: REFRESH_TTL_SECS,
        }
    }

    /// Issue a (session, refresh) pair carrying the same identity claims
    /// with kind-specific expiry policies.
    pub fn issue_pair(
        &self,
        user_id: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
    ) -> Result<(String, String), AuthError> {
        let session = self.mint(user_id, email, first_name, last_name, role, self.session_ttl)?;
        let refresh = self.mint(user_id, email, first_name, last_name, role, self.refresh_ttl)?;
        Ok((session, refresh))
    }

    fn mint(
        &self,
        user_id: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
        ttl: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role,
            iat: now,
            exp: now + ttl,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                _ => TokenError::Malformed,
            })
    }
}
