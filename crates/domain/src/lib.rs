//! Domain layer - Pure business logic with no external dependencies
//!
//! This crate contains:
//! - Entities (Device, DeviceType)
//! - Value Objects (DeviceId, DeviceStatus, SimChange)
//! - The Inventory aggregate with the registry and SIM tracking rules
//! - The derived SIM transfer ledger
//! - Persistence port (InventoryStore)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Business rules enforced at domain level
//! - Testable in isolation

pub mod device;
pub mod device_type;
pub mod error;
pub mod inventory;
pub mod sim;

// Re-export commonly used types
pub use device::{Device, DeviceFilter, DeviceId, DevicePatch, DeviceStatus, NewDevice, SimChange};
pub use device_type::DeviceType;
pub use error::{DomainError, EntityRef};
pub use inventory::{Inventory, InventoryStore, RegistryPolicy};
pub use sim::{TransferEvent, TransferKind};
