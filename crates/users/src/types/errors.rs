//! Error types for the user management system.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use userdesk_database::DatabaseError;
use utoipa::ToSchema;

/// One rejected input field. `field` uses dotted paths such as `address.geo.lat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field error found while checking a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

/// User-related errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    /// Holds the conflicting field (`email` or `username`).
    #[error("User with this {0} already exists")]
    UserAlreadyExists(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    #[error("Password hashing failed")]
    PasswordHashingFailed,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Authentication-related errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication token required")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("User no longer exists")]
    UserNoLongerExists,

    #[error("Token creation failed: {0}")]
    TokenCreationFailed(String),

    #[error(transparent)]
    User(#[from] UserError),
}

pub type UserResult<T> = Result<T, UserError>;
pub type AuthResult<T> = Result<T, AuthError>;

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        UserError::ValidationFailed(errors)
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        AuthError::User(UserError::ValidationFailed(errors))
    }
}

impl From<DatabaseError> for UserError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => UserError::UserNotFound,
            DatabaseError::Duplicate(field) => UserError::UserAlreadyExists(field),
            DatabaseError::ValidationError(message) => {
                UserError::ValidationFailed(ValidationErrors::single("body", message))
            }
            other => UserError::DatabaseError(other.to_string()),
        }
    }
}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        AuthError::User(err.into())
    }
}
