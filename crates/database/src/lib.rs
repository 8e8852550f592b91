//! Userdesk Database Crate
//!
//! Connection management, embedded migrations and the user repository.

use sqlx::SqlitePool;
use userdesk_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::UserRepository;

pub use entities::{
    Address, AddressChanges, Company, CompanyChanges, Credential, Geo, GeoChanges, NewUser, User,
    UserChanges,
};

pub use types::{DatabaseError, DatabaseResult};

/// Open the pool and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
