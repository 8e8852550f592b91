mod error;
mod middleware;
mod state;
mod util;

pub mod docs;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use middleware::require_auth;
pub use state::AppState;
pub use util::require_bearer;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/users", get(routes::users::list_users))
        .route("/api/users/", get(routes::users::list_users))
        .route(
            "/api/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/users/register", post(routes::auth::register))
        .route("/api/users/login", post(routes::auth::login))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
