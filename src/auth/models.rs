// Authentication request/response DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Signup payload
///
/// Every field is optional at the deserialization boundary so that missing
/// values surface through the validation schema as a field -> message map
/// instead of a serde rejection.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub usertype: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token refresh payload; the old session token is accepted but only the
/// refresh token's validity gates the operation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub token: Option<String>,
    pub refreshtoken: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub token: String,
    pub refreshtoken: String,
}
