//! Authentication service: login and bearer token verification.

use once_cell::sync::Lazy;
use tracing::{debug, info};

use super::user_service::UserRepo;
use crate::types::{AuthError, AuthResult, AuthenticatedUser, LoginRequest, LoginResponse, UserError};
use crate::utils::{hash_password, validate_login, verify_password, JwtManager};

// Verified against when the email is unknown so both failures cost the same.
static DECOY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("userdesk-decoy-password").ok());

async fn verify_password_blocking(password: String, hash: Option<String>) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            if let Some(decoy) = DECOY_HASH.as_deref() {
                verify_password(&password, decoy);
            }
            false
        }
    })
    .await
    .map_err(|_| AuthError::User(UserError::PasswordHashingFailed))
}

/// Service for managing authentication operations
pub struct AuthService<R> {
    repository: R,
    jwt: JwtManager,
}

impl<R> AuthService<R>
where
    R: UserRepo,
{
    pub fn new(repository: R, jwt: JwtManager) -> Self {
        Self { repository, jwt }
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    /// Exchange an email and password for a signed token.
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<LoginResponse> {
        let (email, password) = validate_login(&request)?;

        let user = self.repository.find_by_email(&email).await?;
        let credential = match &user {
            Some(user) => self.repository.find_credential(user.id).await?,
            None => None,
        };

        let verified =
            verify_password_blocking(password, credential.map(|c| c.password_hash)).await?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                debug!(email = %email, "login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let issued = self.jwt.generate_token(user.id, &user.email)?;
        info!(user_id = user.id, "user logged in");

        Ok(LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at.to_rfc3339(),
            user: user.into(),
        })
    }

    /// Resolve a bearer token to the user it was issued for.
    pub async fn authenticate(&self, token: &str) -> AuthResult<AuthenticatedUser> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = self.jwt.validate_token(token)?;
        let user_id = claims.user_id()?;

        let Some(user) = self.repository.find_by_id(user_id).await? else {
            return Err(AuthError::UserNoLongerExists);
        };
        if self.repository.find_credential(user.id).await?.is_none() {
            return Err(AuthError::UserNoLongerExists);
        }

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
        })
    }
}
