use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "userdesk.toml",
    "config/userdesk.toml",
    "crates/config/userdesk.toml",
    "../userdesk.toml",
    "../config/userdesk.toml",
];

/// Longest accepted token lifetime (ten years). Larger values are clamped.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Secret used when nothing is configured. Only suitable for local development.
pub const DEVELOPMENT_JWT_SECRET: &str = "userdesk-development-secret-change-me";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://userdesk.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Token signing settings.
///
/// ```
/// use userdesk_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert_eq!(auth.token_ttl_seconds, 86_400);
/// assert!(auth.uses_development_secret());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_secret")]
    pub jwt_secret: String,
    #[serde(default = "AuthConfig::default_token_ttl")]
    pub token_ttl_seconds: u64,
    #[serde(default = "AuthConfig::default_issuer")]
    pub issuer: String,
    #[serde(default = "AuthConfig::default_audience")]
    pub audience: String,
}

impl AuthConfig {
    fn default_secret() -> String {
        DEVELOPMENT_JWT_SECRET.to_string()
    }

    const fn default_token_ttl() -> u64 {
        86_400
    }

    fn default_issuer() -> String {
        "userdesk".to_string()
    }

    fn default_audience() -> String {
        "userdesk-users".to_string()
    }

    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Self::default_secret(),
            token_ttl_seconds: Self::default_token_ttl(),
            issuer: Self::default_issuer(),
            audience: Self::default_audience(),
        }
    }
}

// Keeps the signing secret out of `?config` debug logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use userdesk_config::load;
///
/// std::env::remove_var("USERDESK_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let token_ttl = i64::try_from(defaults.auth.token_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.jwt_secret", defaults.auth.jwt_secret.clone())?
        .set_default("auth.token_ttl_seconds", token_ttl)?
        .set_default("auth.issuer", defaults.auth.issuer.clone())?
        .set_default("auth.audience", defaults.auth.audience.clone())?;

    let environment_overrides = config::Environment::with_prefix("USERDESK").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("USERDESK_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via USERDESK_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
        warn!(
            configured = config.auth.token_ttl_seconds,
            max = MAX_TOKEN_TTL_SECONDS,
            "token ttl too large, clamping"
        );
        config.auth.token_ttl_seconds = MAX_TOKEN_TTL_SECONDS;
    }

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
