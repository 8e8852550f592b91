use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use tracing::info;
use userdesk_users::{AuthenticatedUser, UpdateUserRequest, UserProfile};

use crate::{ApiError, AppState};

type UserIdPath = WithRejection<Path<i64>, ApiError>;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All users ordered by id", body = [UserProfile]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let users = state.users().list().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserProfile),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): UserIdPath,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state.users().get(id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserProfile),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or username already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedUser>,
    WithRejection(Path(id), _): UserIdPath,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state.users().update(id, payload).await?;
    info!(user_id = id, by = principal.id, "user updated via api");
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedUser>,
    WithRejection(Path(id), _): UserIdPath,
) -> Result<StatusCode, ApiError> {
    state.users().delete(id).await?;
    info!(user_id = id, by = principal.id, "user deleted via api");
    Ok(StatusCode::NO_CONTENT)
}
