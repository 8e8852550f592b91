//! Bearer authentication for protected routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{util::require_bearer, ApiError, AppState};

/// Verifies the bearer token and stores the `AuthenticatedUser` in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = require_bearer(request.headers())?;
    let principal = state.authenticate(&token).await?;
    debug!(user_id = principal.id, "request authenticated");

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
