use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::repositories::{self, DatabaseRepository, InMemoryRepository, WorkLogRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Work log storage picked by `STORE_BACKEND`
    pub repository: Arc<dyn WorkLogRepository>,
    pub config: Config,
}

impl AppState {
    /// Connect to the configured store and run startup maintenance
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let repository: Arc<dyn WorkLogRepository> = match config.store_backend {
            StoreBackend::Database => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| AppStateError::Database("DATABASE_URL is not set".to_string()))?;

                let repository = DatabaseRepository::connect(
                    url,
                    config.database_max_connections,
                    config.database_min_connections,
                )
                .await
                .map_err(|e| AppStateError::Database(e.to_string()))?;

                Arc::new(repository)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; work logs are lost on restart");
                Arc::new(InMemoryRepository::new())
            }
        };

        Self::with_repository(config, repository).await
    }

    /// Create AppState over an existing repository (for testing)
    pub async fn with_repository(
        config: Config,
        repository: Arc<dyn WorkLogRepository>,
    ) -> Result<Self, AppStateError> {
        let report = repositories::prepare(repository.as_ref(), config.seed_sample_data)
            .await
            .map_err(|e| AppStateError::Bootstrap(e.to_string()))?;

        tracing::info!(
            migrated = report.migrated,
            seeded = report.seeded,
            "Work log store ready"
        );

        Ok(Self { repository, config })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Database connection error: {0}")]
    Database(String),

    #[error("Startup maintenance error: {0}")]
    Bootstrap(String),
}
