//! Domain entities for the database layer

pub mod address;
pub mod company;
pub mod credential;
pub mod user;

pub use address::{Address, AddressChanges, Geo, GeoChanges};
pub use company::{Company, CompanyChanges};
pub use credential::Credential;
pub use user::{NewUser, User, UserChanges};
