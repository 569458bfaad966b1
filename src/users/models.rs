// User directory data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// User role, stored as the Postgres enum type `user_role`
///
/// Kept as a closed enum so authorization checks are exhaustive and an
/// unknown role is unrepresentable past the deserialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::User => write!(f, "USER"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// A user record as stored in the `users` table
///
/// Wire field names follow the public API contract (`firstname`, `usertype`,
/// `refreshtoken`, ...). The password hash is never serialized outward.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(rename = "usertype")]
    pub user_type: Role,
    pub token: Option<String>,
    #[serde(rename = "refreshtoken")]
    pub refresh_token: Option<String>,
    #[serde(rename = "createdat")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedat")]
    pub updated_at: DateTime<Utc>,
}

/// Fully assembled record awaiting insertion
///
/// Built by the auth service after validation, hashing, and token issuance;
/// by the time one of these exists, `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub user_type: Role,
    pub token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response body for GET /users
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub total_count: i64,
    pub items: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            user_id: "3f0c9d1e".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@x.com".to_string(),
            phone: "1234567890".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            user_type: Role::User,
            token: Some("session".to_string()),
            refresh_token: Some("refresh".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_string(&sample_user()).expect("serialize user");

        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"userid\":\"3f0c9d1e\""));
        assert!(json.contains("\"firstname\":\"Ann\""));
        assert!(json.contains("\"usertype\":\"USER\""));
        assert!(json.contains("\"refreshtoken\":\"refresh\""));
    }

    #[test]
    fn role_round_trips_through_wire_names() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("USER".parse::<Role>(), Ok(Role::User));
        assert!("manager".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());

        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"USER\"").unwrap(),
            Role::User
        );
    }

    #[test]
    fn role_display_matches_wire_form() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::User.to_string(), "USER");
    }
}
