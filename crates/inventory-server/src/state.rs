use application::InventoryService;
use std::sync::Arc;

pub struct AppState {
    pub inventory: InventoryService,
}

impl AppState {
    pub fn new(inventory: InventoryService) -> Self {
        Self { inventory }
    }

    pub fn shared(inventory: InventoryService) -> Arc<Self> {
        Arc::new(Self::new(inventory))
    }
}
