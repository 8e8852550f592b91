use axum::Json;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            userdesk_users::FieldError,
            userdesk_users::RegisterRequest,
            userdesk_users::UpdateUserRequest,
            userdesk_users::LoginRequest,
            userdesk_users::LoginResponse,
            userdesk_users::UserProfile,
            userdesk_users::types::AddressInput,
            userdesk_users::types::GeoInput,
            userdesk_users::types::CompanyInput,
            userdesk_users::types::AddressView,
            userdesk_users::types::GeoView,
            userdesk_users::types::CompanyView
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "User management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        let mut scheme = Http::new(HttpAuthScheme::Bearer);
        scheme.bearer_format = Some("JWT".to_string());
        components
            .security_schemes
            .insert("bearerAuth".to_string(), SecurityScheme::Http(scheme));
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
