//! Response payloads. None of them carry credential data.

use serde::Serialize;
use userdesk_database::{Address, Company, Geo, User};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoView {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Option<GeoView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyView {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

/// Public representation of a user.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: Option<AddressView>,
    pub company: Option<CompanyView>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// RFC 3339 timestamp after which the token is rejected.
    pub expires_at: String,
    pub user: UserProfile,
}

impl From<Geo> for GeoView {
    fn from(geo: Geo) -> Self {
        Self {
            lat: geo.lat,
            lng: geo.lng,
        }
    }
}

impl From<Address> for AddressView {
    fn from(address: Address) -> Self {
        Self {
            street: address.street,
            suite: address.suite,
            city: address.city,
            zipcode: address.zipcode,
            geo: address.geo.map(GeoView::from),
        }
    }
}

impl From<Company> for CompanyView {
    fn from(company: Company) -> Self {
        Self {
            name: company.name,
            catch_phrase: company.catch_phrase,
            bs: company.bs,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            phone: user.phone,
            website: user.website,
            address: user.address.map(AddressView::from),
            company: user.company.map(CompanyView::from),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
