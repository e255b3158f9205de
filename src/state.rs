use crate::config::AppConfig;
use crate::db;
use crate::templates::Templates;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub templates: Templates,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::with_config(config).await
    }

    /// Connect, migrate and load templates for an explicit configuration.
    pub async fn with_config(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database_url).await?;
        db::migrate(&pool).await?;
        let templates = Templates::new(&config.app_name)?;
        Ok(Self::from_parts(pool, Arc::new(config), templates))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, templates: Templates) -> Self {
        Self {
            db,
            config,
            templates,
        }
    }

    /// Fresh in-memory database with the schema applied.
    pub async fn in_memory() -> anyhow::Result<Self> {
        Self::with_config(AppConfig {
            database_url: "sqlite::memory:".into(),
            ..AppConfig::default()
        })
        .await
    }
}
