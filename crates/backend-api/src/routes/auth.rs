use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use userdesk_users::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};

use crate::{ApiError, AppState};

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserProfile),
        (status = 400, description = "Invalid registration payload", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or username already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let user = state.users().create(payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid login payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.auth().login(payload).await?;
    Ok(Json(response))
}
