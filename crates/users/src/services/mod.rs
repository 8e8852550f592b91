//! Business logic services for the user management system.

pub mod auth_service;
pub mod user_service;

#[cfg(test)]
mod mock_repositories;

pub use auth_service::AuthService;
pub use user_service::{UserRepo, UserService};
