mod json_file_store;
mod memory_store;
mod sqlite_store;

pub use json_file_store::JsonFileInventoryStore;
pub use memory_store::MemoryInventoryStore;
pub use sqlite_store::SqliteInventoryStore;

use std::sync::Arc;

use anyhow::{Context, Result};
use domain::{DomainError, InventoryStore};
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};

pub(crate) fn persistence_error(action: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Persistence(format!("Failed to {}: {}", action, err))
}

/// Build the adapter selected in configuration
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn InventoryStore>> {
    let store: Arc<dyn InventoryStore> = match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory inventory store");
            Arc::new(MemoryInventoryStore::new())
        }
        StorageBackend::Json => {
            info!(path = %config.path.display(), "Using JSON file inventory store");
            Arc::new(JsonFileInventoryStore::new(&config.path))
        }
        StorageBackend::Sqlite => {
            info!(path = %config.path.display(), "Using SQLite inventory store");
            let store = SqliteInventoryStore::open(&config.path)
                .await
                .with_context(|| format!("opening SQLite store at {}", config.path.display()))?;
            Arc::new(store)
        }
    };

    Ok(store)
}
