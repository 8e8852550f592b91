//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    /// A unique column rejected the write. Holds the column name.
    #[error("Duplicate value for {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return DatabaseError::Duplicate(unique_violation_column(db_err.message()));
            }
        }
        DatabaseError::QueryError(err.to_string())
    }
}

/// Pulls the column out of SQLite's `UNIQUE constraint failed: users.email`.
fn unique_violation_column(message: &str) -> String {
    message
        .rsplit("UNIQUE constraint failed:")
        .next()
        .and_then(|columns| columns.split(',').next())
        .map(str::trim)
        .and_then(|qualified| qualified.rsplit('.').next())
        .filter(|column| !column.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
