//! Shared types for the user management system.

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{AuthError, AuthResult, FieldError, UserError, UserResult, ValidationErrors};
pub use requests::{
    AddressInput, CompanyInput, GeoInput, LoginRequest, RegisterRequest, UpdateUserRequest,
};
pub use responses::{AddressView, CompanyView, GeoView, LoginResponse, UserProfile};

pub type UserId = i64;

/// The user a verified bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
}
