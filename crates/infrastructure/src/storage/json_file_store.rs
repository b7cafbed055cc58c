use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domain::{DomainError, Inventory, InventoryStore};
use tracing::{debug, warn};

use super::persistence_error;

/// Whole inventory as one pretty-printed JSON file.
///
/// Saves go to a sibling `.tmp` file that is then renamed over the target,
/// so readers only ever see a complete document.
pub struct JsonFileInventoryStore {
    path: PathBuf,
}

impl JsonFileInventoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "inventory.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl InventoryStore for JsonFileInventoryStore {
    async fn load(&self) -> Result<Option<Inventory>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No inventory file yet");
                return Ok(None);
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read inventory file");
                return Err(persistence_error("read inventory file", e));
            }
        };

        let inventory = serde_json::from_slice(&bytes)
            .map_err(|e| persistence_error("parse inventory file", e))?;
        Ok(Some(inventory))
    }

    async fn save(&self, inventory: &Inventory) -> Result<(), DomainError> {
        let json = serde_json::to_vec_pretty(inventory)
            .map_err(|e| persistence_error("serialize inventory", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence_error("create data directory", e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &json)
            .await
            .map_err(|e| persistence_error("write inventory file", e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| persistence_error("replace inventory file", e))?;

        debug!(path = %self.path.display(), bytes = json.len(), "Inventory saved");
        Ok(())
    }
}
