use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{info, warn};
use userdesk_backend_api::AppState;
use userdesk_config::AppConfig;
use userdesk_database::initialize_database;
use userdesk_users::JwtManager;

pub mod seed;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub state: AppState,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        if config.auth.uses_development_secret() {
            warn!("using the built-in development JWT secret; set USERDESK__AUTH__JWT_SECRET");
        }

        let jwt = JwtManager::new(
            &config.auth.jwt_secret,
            config.auth.issuer.clone(),
            config.auth.audience.clone(),
        )
        .with_duration(Duration::from_secs(config.auth.token_ttl_seconds));

        let state = AppState::new(db_pool.clone(), jwt);
        info!(
            ttl_seconds = config.auth.token_ttl_seconds,
            "backend services ready"
        );

        Ok(Self { db_pool, state })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
