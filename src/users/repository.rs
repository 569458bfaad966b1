// Persistence-backed store for user records

use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::users::models::{NewUser, User};

const USER_COLUMNS: &str = "user_id, first_name, last_name, email, phone, password_hash, \
     user_type, token, refresh_token, created_at, updated_at";

/// User directory backed by the `users` table
///
/// Every call is bounded by a per-operation deadline; an elapsed deadline
/// abandons the operation and surfaces as an internal error. Nothing here
/// retries.
#[derive(Clone)]
pub struct UserDirectory {
    pool: PgPool,
    op_timeout: Duration,
}

impl UserDirectory {
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    /// Fast-path uniqueness pre-check before insertion
    ///
    /// Non-atomic with the subsequent insert; the unique indexes on email
    /// and phone remain the authoritative conflict signal.
    pub async fn exists_by_email_or_phone(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<i64, ApiError> {
        let count = self
            .bounded(
                "exists_by_email_or_phone",
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM users WHERE email = $1 OR phone = $2",
                )
                .bind(email)
                .bind(phone)
                .fetch_one(&self.pool),
            )
            .await?;

        Ok(count)
    }

    /// Persist a new record; a unique-index violation on email or phone
    /// surfaces as `Conflict`.
    pub async fn create(&self, user: &NewUser) -> Result<String, ApiError> {
        debug!("Inserting user record {}", user.user_id);

        self.bounded(
            "create",
            sqlx::query(
                r#"
                INSERT INTO users
                    (user_id, first_name, last_name, email, phone, password_hash,
                     user_type, token, refresh_token, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(&user.user_id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.user_type)
            .bind(&user.token)
            .bind(&user.refresh_token)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool),
        )
        .await?;

        Ok(user.user_id.clone())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        self.bounded(
            "find_by_email",
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
            ))
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        self.bounded(
            "find_by_id",
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
            ))
            .bind(user_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    /// Stable-ordered page of records plus the total record count
    pub async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<User>, i64), ApiError> {
        let items = self
            .bounded(
                "list",
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC LIMIT $1 OFFSET $2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool),
            )
            .await?;

        let total_count = self
            .bounded(
                "count",
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&self.pool),
            )
            .await?;

        Ok((items, total_count))
    }

    /// Overwrite both token fields and bump updated-at
    ///
    /// Last-write-wins; concurrent logins for the same user interleave
    /// silently.
    pub async fn update_tokens(
        &self,
        user_id: &str,
        session_token: &str,
        refresh_token: &str,
    ) -> Result<(), ApiError> {
        self.bounded(
            "update_tokens",
            sqlx::query(
                "UPDATE users SET token = $2, refresh_token = $3, updated_at = NOW() \
                 WHERE user_id = $1",
            )
            .bind(user_id)
            .bind(session_token)
            .bind(refresh_token)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    /// Run one store operation under the per-request deadline
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return Err(ApiError::Conflict {
                            message: "This email or phone already exists".to_string(),
                        });
                    }
                }
                Err(ApiError::Database(e))
            }
            Err(_) => {
                error!(
                    "Database operation '{}' exceeded the {}s deadline",
                    op,
                    self.op_timeout.as_secs()
                );
                Err(ApiError::Internal(format!(
                    "database operation '{}' timed out",
                    op
                )))
            }
        }
    }
}
