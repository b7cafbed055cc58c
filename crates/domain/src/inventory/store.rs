use super::Inventory;
use crate::DomainError;
use async_trait::async_trait;

/// Persistence port for the inventory document
///
/// This trait defines the contract for storing and retrieving the whole
/// document. Implementations should be provided in the infrastructure layer
/// and report every failure as [`DomainError::Persistence`].
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Last saved document, or `None` when nothing was persisted yet
    async fn load(&self) -> Result<Option<Inventory>, DomainError>;

    /// Durably replace the stored document
    async fn save(&self, inventory: &Inventory) -> Result<(), DomainError>;
}
