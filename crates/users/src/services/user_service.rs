//! User service for managing user operations.

use tracing::{info, warn};
use userdesk_database::{Credential, DatabaseResult, NewUser, User, UserChanges, UserRepository};

use crate::types::{RegisterRequest, UpdateUserRequest, UserError, UserId, UserResult};
use crate::utils::{hash_password, validate_registration, validate_update};

/// Storage operations the services depend on
pub trait UserRepo {
    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>>;
    async fn find_credential(&self, user_id: UserId) -> UserResult<Option<Credential>>;
    async fn list(&self) -> UserResult<Vec<User>>;
    async fn create(&self, new_user: &NewUser) -> UserResult<User>;
    async fn update(&self, id: UserId, changes: &UserChanges) -> UserResult<User>;
    async fn delete(&self, id: UserId) -> UserResult<()>;
    async fn count(&self) -> UserResult<i64>;
}

fn lift<T>(result: DatabaseResult<T>) -> UserResult<T> {
    result.map_err(UserError::from)
}

impl UserRepo for UserRepository {
    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        lift(UserRepository::find_by_id(self, id).await)
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        lift(UserRepository::find_by_email(self, email).await)
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        lift(UserRepository::find_by_username(self, username).await)
    }

    async fn find_credential(&self, user_id: UserId) -> UserResult<Option<Credential>> {
        lift(UserRepository::find_credential(self, user_id).await)
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        lift(UserRepository::list(self).await)
    }

    async fn create(&self, new_user: &NewUser) -> UserResult<User> {
        lift(UserRepository::create(self, new_user).await)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> UserResult<User> {
        lift(UserRepository::update(self, id, changes).await)
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        lift(UserRepository::delete(self, id).await)
    }

    async fn count(&self) -> UserResult<i64> {
        lift(UserRepository::count(self).await)
    }
}

/// Hashes on the blocking pool so Argon2 does not stall the runtime.
pub(crate) async fn hash_password_blocking(password: String) -> UserResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| UserError::PasswordHashingFailed)?
}

/// Service for managing user operations
pub struct UserService<R> {
    repository: R,
}

impl<R> UserService<R>
where
    R: UserRepo,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Register a user along with its nested records and credential
    pub async fn create(&self, request: RegisterRequest) -> UserResult<User> {
        let registration = validate_registration(&request)?;

        self.ensure_available(Some(&registration.email), Some(&registration.username), None)
            .await?;

        let password_hash = hash_password_blocking(registration.password).await?;

        let new_user = NewUser {
            name: registration.name,
            username: registration.username,
            email: registration.email,
            phone: registration.phone,
            website: registration.website,
            password_hash,
            address: registration.address,
            company: registration.company,
        };

        let user = self.repository.create(&new_user).await?;
        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    pub async fn list(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    /// Apply a partial update
    pub async fn update(&self, id: UserId, request: UpdateUserRequest) -> UserResult<User> {
        let existing = self.get(id).await?;
        let patch = validate_update(&request, &existing)?;

        let email = patch
            .changes
            .email
            .as_deref()
            .filter(|email| *email != existing.email);
        let username = patch
            .changes
            .username
            .as_deref()
            .filter(|username| *username != existing.username);
        self.ensure_available(email, username, Some(id)).await?;

        let mut changes = patch.changes;
        if let Some(password) = patch.password {
            changes.password_hash = Some(hash_password_blocking(password).await?);
        }

        let user = self.repository.update(id, &changes).await?;
        info!(user_id = id, password_changed = changes.password_hash.is_some(), "user updated");
        Ok(user)
    }

    pub async fn delete(&self, id: UserId) -> UserResult<()> {
        self.repository.delete(id).await?;
        warn!(user_id = id, "user deleted");
        Ok(())
    }

    /// Reject an email or username that belongs to someone other than `owner`.
    async fn ensure_available(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        owner: Option<UserId>,
    ) -> UserResult<()> {
        let taken = |user: &User| owner != Some(user.id);

        if let Some(email) = email {
            if self.repository.find_by_email(email).await?.is_some_and(|u| taken(&u)) {
                return Err(UserError::UserAlreadyExists("email".to_string()));
            }
        }

        if let Some(username) = username {
            if self
                .repository
                .find_by_username(username)
                .await?
                .is_some_and(|u| taken(&u))
            {
                return Err(UserError::UserAlreadyExists("username".to_string()));
            }
        }

        Ok(())
    }
}
