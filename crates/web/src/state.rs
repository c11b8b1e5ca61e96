//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{PulseConfig, StorageBackend};
use crate::db::{self, MemoryPulseStore, PgPulseStore, PulseStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PulseConfig,
    store: Arc<dyn PulseStore>,
}

impl AppState {
    /// Create a new application state around an existing store.
    #[must_use]
    pub fn new(config: PulseConfig, store: Arc<dyn PulseStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Build the state with the store selected by `config.storage`.
    ///
    /// The `PostgreSQL` pool is lazy, so this succeeds with the database down.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the database URL cannot be parsed.
    pub fn from_config(config: PulseConfig) -> Result<Self, sqlx::Error> {
        let store: Arc<dyn PulseStore> = match config.storage {
            StorageBackend::Postgres => {
                let pool = db::create_lazy_pool(&config.database_url, config.db_acquire_timeout)?;
                Arc::new(PgPulseStore::new(pool))
            }
            StorageBackend::Memory => Arc::new(MemoryPulseStore::new()),
        };
        Ok(Self::new(config, store))
    }

    #[must_use]
    pub fn config(&self) -> &PulseConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &dyn PulseStore {
        self.inner.store.as_ref()
    }
}
