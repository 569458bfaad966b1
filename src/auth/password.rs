// Password hashing and verification

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use tracing::error;

use crate::auth::error::AuthError;

/// One-way credential hasher backed by Argon2id
///
/// Uses the default work factor and a fresh 16-byte salt per call, so the
/// same plaintext never produces the same PHC string twice.
#[derive(Clone, Default)]
pub struct CredentialHasher {
    argon: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self {
            argon: Argon2::default(),
        }
    }

    /// Hash a plaintext password into a PHC-format string
    ///
    /// Failure here (entropy or parameter errors) is fatal to the operation
    /// and surfaces as an internal error; it is never retried.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!("Password hashing failed: {}", e);
                AuthError::PasswordHash
            })
    }

    /// Verify a plaintext password against a stored PHC string
    ///
    /// Returns false on any mismatch, including an unparseable hash; the
    /// caller learns nothing about which. The digest comparison inside
    /// argon2 is constant-time.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
