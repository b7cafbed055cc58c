pub mod api;
pub mod error;
pub mod extract;
pub mod state;

use anyhow::Result;
use application::InventoryService;
use infrastructure::{ServerConfig, open_store, seed::sample_inventory};
use state::AppState;
use std::sync::Arc;

/// Open the configured store and load (or seed) the inventory
pub async fn setup_app_state(config: &ServerConfig) -> Result<Arc<AppState>> {
    let store = open_store(&config.storage).await?;
    let seed = config
        .seed_sample_data
        .then(sample_inventory)
        .transpose()?;
    let inventory = InventoryService::open(store, config.registry, seed).await?;
    Ok(AppState::shared(inventory))
}
