mod service;

pub use service::InventoryService;
