use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};

use crate::config::AppConfig;
use crate::notify::{MockEmailGateway, MockSmsGateway, Notifier};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub sms: Arc<dyn Notifier>,
    pub email: Arc<dyn Notifier>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        if let Some(path) = config
            .database_url
            .strip_prefix("sqlite://")
            .map(|p| p.split('?').next().unwrap_or(p))
        {
            if let Some(dir) = std::path::Path::new(path).parent() {
                if !dir.as_os_str().is_empty() {
                    std::fs::create_dir_all(dir).context("create database directory")?;
                }
            }
        }

        let opts = SqliteConnectOptions::from_str(&config.database_url)
            .context("parse DATABASE_URL")?
            .create_if_missing(true)
            .foreign_keys(true)
            // No WAL or checkpointing here; every commit is flushed before
            // the request returns.
            .synchronous(SqliteSynchronous::Full);

        // Single connection: the store is a single shared file handle and
        // all writes serialize through it.
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .context("connect to database")?;

        Ok(Self {
            db,
            config,
            sms: Arc::new(MockSmsGateway),
            email: Arc::new(MockEmailGateway),
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        sms: Arc<dyn Notifier>,
        email: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            db,
            config,
            sms,
            email,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory store with the full schema applied, recording gateways.
    pub async fn for_tests() -> Self {
        use crate::config::JwtConfig;
        use crate::notify::doubles::RecordingNotifier;

        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("memory options")
            .foreign_keys(true);
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await
            .expect("memory pool");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .expect("migrations");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            dev_mode: true,
        });

        Self {
            db,
            config,
            sms: Arc::new(RecordingNotifier::default()),
            email: Arc::new(RecordingNotifier::default()),
        }
    }
}
