//! Application layer - Use cases and business workflows

pub mod inventory;

pub use inventory::InventoryService;
