//! JWT (JSON Web Token) utilities for authentication.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::types::{AuthError, UserId};

const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Upper bound on token lifetime (ten years); keeps `exp` inside chrono's range.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id as a decimal string.
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))
    }
}

/// A signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT token manager
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    token_ttl_seconds: i64,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, issuer: String, audience: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }

    /// Set custom token duration, clamped to `MAX_TOKEN_TTL_SECONDS`
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.token_ttl_seconds = i64::try_from(duration.as_secs())
            .unwrap_or(i64::MAX)
            .min(MAX_TOKEN_TTL_SECONDS);
        self
    }

    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    /// Sign a token for `user_id`
    pub fn generate_token(&self, user_id: UserId, email: &str) -> Result<IssuedToken, AuthError> {
        let now = Utc::now().timestamp();
        let exp = now.saturating_add(self.token_ttl_seconds);
        let expires_at = DateTime::<Utc>::from_timestamp(exp, 0).ok_or_else(|| {
            AuthError::TokenCreationFailed("token lifetime out of range".to_string())
        })?;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp,
            iat: now,
            nbf: now,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AuthError::TokenCreationFailed(err.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate and decode a JWT token.
    ///
    /// Expiry is reported separately from every other failure.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(err.to_string()),
            })
    }
}
