// HTTP handlers for user directory endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::auth::middleware::{require_role, require_self_or_admin, AuthenticatedClaims};
use crate::error::ApiError;
use crate::query::{ListParams, Pagination};
use crate::users::models::{Role, User, UserListResponse};
use crate::AppState;

/// List user records, admin only
/// GET /users?page=&recordPerPage=&startIndex=
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Page of users ordered by creation time", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = String, example = json!({"error_code": "UNAUTHENTICATED"})),
        (status = 403, description = "Requester is not an admin", body = String, example = json!({"error_code": "FORBIDDEN"}))
    ),
    tag = "users"
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    AuthenticatedClaims(claims): AuthenticatedClaims,
    Query(params): Query<ListParams>,
) -> Result<Json<UserListResponse>, ApiError> {
    require_role(&claims, Role::Admin)?;

    let pagination = Pagination::from_params(&params);
    tracing::debug!(
        "Admin {} listing users, limit {} offset {}",
        claims.sub,
        pagination.limit,
        pagination.offset
    );

    let (items, total_count) = state
        .directory
        .list(pagination.limit, pagination.offset)
        .await?;

    Ok(Json(UserListResponse { total_count, items }))
}

/// Fetch a single record, owner or admin only
/// GET /users/:user_id
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User record, password omitted", body = User),
        (status = 401, description = "Missing or invalid token", body = String, example = json!({"error_code": "UNAUTHENTICATED"})),
        (status = 403, description = "Requester is neither owner nor admin", body = String, example = json!({"error_code": "FORBIDDEN"})),
        (status = 404, description = "No such user", body = String, example = json!({"error_code": "NOT_FOUND"}))
    ),
    tag = "users"
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    AuthenticatedClaims(claims): AuthenticatedClaims,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    require_self_or_admin(&claims, &user_id)?;

    let user = state
        .directory
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "User".to_string(),
            id: user_id,
        })?;

    Ok(Json(user))
}
