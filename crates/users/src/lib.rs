//! # Userdesk Users Crate
//!
//! User management and authentication for Userdesk: request validation,
//! password hashing, token issuance and verification, and the services the
//! HTTP layer calls into.
//!
//! ## Architecture
//!
//! - **Services**: `UserService` and `AuthService`, generic over a `UserRepo`
//! - **Types**: request/response payloads and error enums
//! - **Utils**: validation, password hashing, JWT handling

pub mod services;
pub mod types;
pub mod utils;

pub use userdesk_database::{User, UserRepository};

pub use services::{AuthService, UserRepo, UserService};
pub use types::{
    AuthError, AuthResult, AuthenticatedUser, FieldError, LoginRequest, LoginResponse,
    RegisterRequest, UpdateUserRequest, UserError, UserProfile, UserResult, ValidationErrors,
};
pub use utils::{IssuedToken, JwtManager};
