use async_trait::async_trait;
use domain::{DomainError, Inventory, InventoryStore};
use tokio::sync::RwLock;

/// Keeps the last saved document in memory. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryInventoryStore {
    saved: RwLock<Option<Inventory>>,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `inventory`, as if it had been saved
    pub fn with_inventory(inventory: Inventory) -> Self {
        Self {
            saved: RwLock::new(Some(inventory)),
        }
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn load(&self) -> Result<Option<Inventory>, DomainError> {
        Ok(self.saved.read().await.clone())
    }

    async fn save(&self, inventory: &Inventory) -> Result<(), DomainError> {
        *self.saved.write().await = Some(inventory.clone());
        Ok(())
    }
}
