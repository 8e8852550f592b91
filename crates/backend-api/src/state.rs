use std::sync::Arc;

use sqlx::SqlitePool;
use userdesk_database::UserRepository;
use userdesk_users::{AuthService, AuthenticatedUser, JwtManager, UserService};

use crate::ApiError;

#[derive(Clone)]
pub struct AppState {
    users: Arc<UserService<UserRepository>>,
    auth: Arc<AuthService<UserRepository>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtManager) -> Self {
        let repository = UserRepository::new(pool);
        Self {
            users: Arc::new(UserService::new(repository.clone())),
            auth: Arc::new(AuthService::new(repository, jwt)),
        }
    }

    pub fn users(&self) -> &UserService<UserRepository> {
        &self.users
    }

    pub fn auth(&self) -> &AuthService<UserRepository> {
        &self.auth
    }

    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, ApiError> {
        self.auth.authenticate(token).await.map_err(ApiError::from)
    }
}
