//! In-memory repository used by the service tests

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use userdesk_database::{
    AddressChanges, CompanyChanges, Credential, DatabaseError, NewUser, User, UserChanges,
};

use super::user_service::UserRepo;
use crate::types::{UserError, UserId, UserResult};

#[derive(Default)]
struct Store {
    next_id: UserId,
    users: BTreeMap<UserId, User>,
    credentials: BTreeMap<UserId, Credential>,
}

/// Mock user repository for testing. Clones share the same store.
#[derive(Clone, Default)]
pub struct MockUserRepository {
    store: Arc<RwLock<Store>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user that has no credential, as if created outside registration.
    pub async fn insert_without_credential(&self, mut user: User) -> User {
        let mut store = self.store.write().await;
        store.next_id += 1;
        user.id = store.next_id;
        store.users.insert(user.id, user.clone());
        user
    }

    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

fn duplicate_of(store: &Store, email: &str, username: &str, skip: Option<UserId>) -> Option<String> {
    store
        .users
        .values()
        .filter(|user| Some(user.id) != skip)
        .find_map(|user| {
            if user.email == email {
                Some("email".to_string())
            } else if user.username == username {
                Some("username".to_string())
            } else {
                None
            }
        })
}

fn merge(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

fn incomplete(what: &str) -> UserError {
    DatabaseError::ValidationError(format!("a new {what} is missing fields")).into()
}

fn apply_address(user: &mut User, changes: &AddressChanges) -> UserResult<()> {
    let Some(address) = user.address.as_mut() else {
        user.address = Some(changes.complete().ok_or_else(|| incomplete("address"))?);
        return Ok(());
    };

    merge(&mut address.street, &changes.street);
    merge(&mut address.suite, &changes.suite);
    merge(&mut address.city, &changes.city);
    merge(&mut address.zipcode, &changes.zipcode);

    if let Some(geo_changes) = &changes.geo {
        match address.geo.as_mut() {
            Some(geo) => {
                merge(&mut geo.lat, &geo_changes.lat);
                merge(&mut geo.lng, &geo_changes.lng);
            }
            None => {
                address.geo = Some(geo_changes.complete().ok_or_else(|| incomplete("geo"))?);
            }
        }
    }
    Ok(())
}

fn apply_company(user: &mut User, changes: &CompanyChanges) -> UserResult<()> {
    match user.company.as_mut() {
        Some(company) => {
            merge(&mut company.name, &changes.name);
            merge(&mut company.catch_phrase, &changes.catch_phrase);
            merge(&mut company.bs, &changes.bs);
        }
        None => {
            user.company = Some(changes.complete().ok_or_else(|| incomplete("company"))?);
        }
    }
    Ok(())
}

impl UserRepo for MockUserRepository {
    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_credential(&self, user_id: UserId) -> UserResult<Option<Credential>> {
        Ok(self.store.read().await.credentials.get(&user_id).cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        Ok(self.store.read().await.users.values().cloned().collect())
    }

    async fn create(&self, new_user: &NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;
        if let Some(field) = duplicate_of(&store, &new_user.email, &new_user.username, None) {
            return Err(DatabaseError::Duplicate(field).into());
        }

        store.next_id += 1;
        let id = store.next_id;
        let now = Self::now();

        let user = User {
            id,
            name: new_user.name.clone(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            phone: new_user.phone.clone(),
            website: new_user.website.clone(),
            address: new_user.address.clone(),
            company: new_user.company.clone(),
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        store.users.insert(id, user.clone());
        store.credentials.insert(
            id,
            Credential {
                user_id: id,
                password_hash: new_user.password_hash.clone(),
                created_at: now.clone(),
                updated_at: now,
            },
        );
        Ok(user)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> UserResult<User> {
        let mut store = self.store.write().await;
        let Some(mut user) = store.users.get(&id).cloned() else {
            return Err(UserError::UserNotFound);
        };

        merge(&mut user.name, &changes.name);
        merge(&mut user.username, &changes.username);
        merge(&mut user.email, &changes.email);
        merge(&mut user.phone, &changes.phone);
        if changes.website.is_some() {
            user.website.clone_from(&changes.website);
        }
        if let Some(address) = &changes.address {
            apply_address(&mut user, address)?;
        }
        if let Some(company) = &changes.company {
            apply_company(&mut user, company)?;
        }

        if let Some(field) = duplicate_of(&store, &user.email, &user.username, Some(id)) {
            return Err(DatabaseError::Duplicate(field).into());
        }

        let now = Self::now();
        user.updated_at.clone_from(&now);
        if let Some(hash) = &changes.password_hash {
            let credential = store.credentials.entry(id).or_insert_with(|| Credential {
                user_id: id,
                password_hash: String::new(),
                created_at: now.clone(),
                updated_at: now.clone(),
            });
            credential.password_hash.clone_from(hash);
            credential.updated_at = now;
        }

        store.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        let mut store = self.store.write().await;
        if store.users.remove(&id).is_none() {
            return Err(UserError::UserNotFound);
        }
        store.credentials.remove(&id);
        Ok(())
    }

    async fn count(&self) -> UserResult<i64> {
        Ok(self.store.read().await.users.len() as i64)
    }
}
