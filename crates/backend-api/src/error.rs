use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};
use userdesk_users::{AuthError, FieldError, UserError, ValidationErrors};
use utoipa::ToSchema;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable code such as `token_expired`.
    #[schema(example = "validation_failed")]
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub errors: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            errors: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            errors: Some(errors.into_errors()),
            ..Self::new(StatusCode::BAD_REQUEST, "validation_failed", "Validation failed")
        }
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }

    /// Details stay in the log, never in the response.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            INTERNAL_MESSAGE,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.code.to_string(),
            message: self.message,
            errors: self.errors,
        });
        (self.status, body).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::UserNotFound => Self::not_found("User not found"),
            UserError::UserAlreadyExists(_) => Self::conflict(error.to_string()),
            UserError::ValidationFailed(errors) => Self::validation(errors),
            UserError::PasswordHashingFailed | UserError::DatabaseError(_) => {
                Self::internal(error)
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => {
                Self::unauthorized("invalid_credentials", "Invalid credentials")
            }
            AuthError::MissingToken => {
                Self::unauthorized("token_missing", "Authentication token required")
            }
            AuthError::InvalidToken(detail) => {
                debug!(%detail, "rejected bearer token");
                Self::unauthorized("token_invalid", "Invalid token")
            }
            AuthError::TokenExpired => Self::unauthorized("token_expired", "Token expired"),
            AuthError::UserNoLongerExists => {
                Self::unauthorized("user_missing", "User no longer exists")
            }
            AuthError::TokenCreationFailed(_) => Self::internal(error),
            AuthError::User(inner) => inner.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(error = %rejection.body_text(), "invalid path parameter");
        Self::bad_request("Invalid user id")
    }
}
