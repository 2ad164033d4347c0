use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::domain::repositories::SentimentRepository;
use crate::infrastructure::persistence::database::Database;
use crate::infrastructure::persistence::repositories::SqliteSentimentRepository;

pub struct PersistenceHandle {
    pub db: Database,
    pub sentiment_repository: Arc<dyn SentimentRepository>,
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(config: &Config) -> Result<PersistenceHandle> {
        info!("Initializing Database at {}", config.database_url);

        let db = Database::with_max_connections(&config.database_url, config.max_connections)
            .await
            .context("Failed to initialize database")?;

        let sentiment_repository = Arc::new(SqliteSentimentRepository::new(db.pool.clone()));

        Ok(PersistenceHandle {
            db,
            sentiment_repository,
        })
    }
}
