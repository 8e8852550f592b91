//! Request payloads accepted by the user and auth services.
//!
//! Every field is optional at the serde level so missing fields come back
//! as field-level validation errors instead of a decode failure.

use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoInput {
    #[schema(example = "-37.3159")]
    pub lat: Option<String>,
    #[schema(example = "81.1496")]
    pub lng: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub street: Option<String>,
    pub suite: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub geo: Option<GeoInput>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    pub name: Option<String>,
    pub catch_phrase: Option<String>,
    pub bs: Option<String>,
}

/// Body of `POST /api/users/register`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Leanne Graham")]
    pub name: Option<String>,
    #[schema(example = "Bret")]
    pub username: Option<String>,
    #[schema(example = "sincere@april.biz")]
    pub email: Option<String>,
    #[schema(example = "password123")]
    pub password: Option<String>,
    #[schema(example = "1-770-736-8031 x56442")]
    pub phone: Option<String>,
    #[schema(example = "hildegard.org")]
    pub website: Option<String>,
    pub address: Option<AddressInput>,
    pub company: Option<CompanyInput>,
}

/// Body of `PUT /api/users/:id`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<AddressInput>,
    pub company: Option<CompanyInput>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "sincere@april.biz")]
    pub email: Option<String>,
    #[schema(example = "password123")]
    pub password: Option<String>,
}
