//! Infrastructure layer - Storage adapters, configuration and seed data

pub mod config;
pub mod seed;
pub mod storage;

pub use config::{HttpConfig, ServerConfig, StorageBackend, StorageConfig};
pub use storage::{
    JsonFileInventoryStore, MemoryInventoryStore, SqliteInventoryStore, open_store,
};
