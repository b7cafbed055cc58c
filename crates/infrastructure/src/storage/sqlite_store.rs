use anyhow::Result;
use async_trait::async_trait;
use domain::{DomainError, Inventory, InventoryStore};
use sqlx::{Pool, Sqlite, sqlite::SqliteConnectOptions, sqlite::SqlitePoolOptions};
use std::path::Path;

use super::persistence_error;

/// Inventory document kept as JSON in a single-row SQLite table
#[derive(Clone)]
pub struct SqliteInventoryStore {
    pool: Pool<Sqlite>,
}

impl SqliteInventoryStore {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1) // SQLite is single-writer
            .connect(connection_string)
            .await?;

        Self::with_pool(pool).await
    }

    /// Open (creating if needed) a database file
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: Pool<Sqlite>) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS inventory_document (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                document TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn load(&self) -> Result<Option<Inventory>, DomainError> {
        let document: Option<String> =
            sqlx::query_scalar("SELECT document FROM inventory_document WHERE id = 1")
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| persistence_error("read inventory row", e))?;

        document
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| persistence_error("parse inventory row", e))
    }

    async fn save(&self, inventory: &Inventory) -> Result<(), DomainError> {
        let json = serde_json::to_string(inventory)
            .map_err(|e| persistence_error("serialize inventory", e))?;

        sqlx::query(
            "INSERT INTO inventory_document (id, document, updated_at)
             VALUES (1, ?, strftime('%s','now'))
             ON CONFLICT(id) DO UPDATE SET
                document = excluded.document,
                updated_at = excluded.updated_at",
        )
        .bind(json)
        .execute(&self.pool)
        .await
        .map_err(|e| persistence_error("write inventory row", e))?;

        Ok(())
    }
}
