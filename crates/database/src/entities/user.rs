//! User entity definitions

use serde::{Deserialize, Serialize};

use super::address::{Address, AddressChanges};
use super::company::{Company, CompanyChanges};

/// A user with its owned address and company, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: Option<Address>,
    pub company: Option<Company>,
    pub created_at: String,
    pub updated_at: String,
}

/// Everything needed to insert a user together with its credential.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub password_hash: String,
    pub address: Option<Address>,
    pub company: Option<Company>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub password_hash: Option<String>,
    pub address: Option<AddressChanges>,
    pub company: Option<CompanyChanges>,
}
