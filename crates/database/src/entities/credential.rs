//! Stored password credential

use sqlx::FromRow;

/// Row of the `auth` table. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct Credential {
    pub user_id: i64,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}
