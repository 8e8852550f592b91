use axum::http::{header::AUTHORIZATION, HeaderMap};
use userdesk_users::AuthError;

use crate::ApiError;

/// Extract the bearer token. A missing header or empty token is "missing";
/// any other scheme is "invalid".
pub fn require_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::MissingToken.into());
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("authorization header is not ASCII".to_string()))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or("");
    if scheme.is_empty() {
        return Err(AuthError::MissingToken.into());
    }
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::InvalidToken(format!("unsupported scheme {scheme}")).into());
    }

    let token = parts.next().unwrap_or("");
    if token.is_empty() {
        return Err(AuthError::MissingToken.into());
    }

    Ok(token.to_string())
}
