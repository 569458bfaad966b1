// HTTP handlers for authentication endpoints

use axum::{extract::State, Json};

use crate::auth::models::{
    LoginRequest, RefreshRequest, SignupRequest, SignupResponse, TokenPairResponse,
};
use crate::error::ApiError;
use crate::users::models::User;
use crate::AppState;

/// Register a new user
/// POST /signup
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created", body = SignupResponse),
        (status = 400, description = "Validation failed", body = String, example = json!({"error_code": "VALIDATION_ERROR"})),
        (status = 409, description = "Duplicate email or phone", body = String, example = json!({"error_code": "CONFLICT"}))
    ),
    tag = "auth"
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    tracing::debug!("Signup request received");

    let user_id = state.auth.signup(request).await?;
    Ok(Json(SignupResponse { user_id }))
}

/// Authenticate and receive a fresh token pair on the returned record
/// POST /login
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; record carries the new tokens", body = User),
        (status = 401, description = "Invalid credentials", body = String, example = json!({"error_code": "UNAUTHENTICATED"}))
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(user))
}

/// Exchange a valid refresh token for a new token pair
/// POST /refresh
#[utoipa::path(
    post,
    path = "/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair issued", body = TokenPairResponse),
        (status = 401, description = "Refresh token rejected", body = String, example = json!({"error_code": "UNAUTHENTICATED"}))
    ),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let pair = state.auth.refresh(request).await?;
    Ok(Json(pair))
}
