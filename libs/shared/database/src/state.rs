use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;

use crate::error::StoreResult;
use crate::memory::MemoryStore;
use crate::postgres::PgStore;
use crate::repository::HospitalStore;

/// Shared by every handler through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn HospitalStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn HospitalStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Connects to Postgres and applies pending migrations, or falls back to
    /// the in-memory store when no database URL is configured.
    pub async fn connect(config: AppConfig) -> StoreResult<Self> {
        if config.uses_in_memory_store() {
            info!("Using in-memory store");
            return Ok(Self::in_memory(config));
        }

        let store = PgStore::connect(&config).await?;
        store.migrate().await?;
        info!("Using Postgres store");

        Ok(Self::new(config, Arc::new(store)))
    }
}
