//! Internal utilities for the user management system.

pub mod jwt;
pub mod password;
pub mod validation;

pub use jwt::{Claims, IssuedToken, JwtManager, MAX_TOKEN_TTL_SECONDS};
pub use password::{hash_password, verify_password};
pub use validation::{validate_login, validate_registration, validate_update, Registration, UserPatch};
