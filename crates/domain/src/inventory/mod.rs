//! The inventory aggregate: the single document holding every device and
//! device type, plus the id sequences.
//!
//! All rules live on [`Inventory`]:
//! - registry operations (create, update, delete, toggle, lookup) in `registry`
//! - SIM tracking (uniqueness, change with history, ledger) in `tracker`
//! - device type management in `device_types`
//!
//! Operations are synchronous and mutate in place; the application layer runs
//! them on a working copy and commits only after the copy is persisted.

mod device_types;
mod policy;
mod registry;
mod stats;
mod store;
mod tracker;

pub use policy::RegistryPolicy;
pub use stats::{DeviceFacets, InventoryStats};
#[cfg(any(test, feature = "mocks"))]
pub use store::MockInventoryStore;
pub use store::InventoryStore;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceId};
use crate::device_type::{DEFAULT_DEVICE_TYPE, DeviceType};
use crate::error::{DomainError, EntityRef, Result};
use crate::sim::{normalize_sim, parse_sim};

/// Next identifiers to hand out. Only ever increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequences {
    pub next_device_id: u64,
    pub next_device_type_id: u64,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            next_device_id: 1,
            next_device_type_id: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredInventory")]
pub struct Inventory {
    devices: Vec<Device>,
    device_types: Vec<DeviceType>,
    sequences: Sequences,
}

/// Raw persisted layout, checked and reconciled into an [`Inventory`] on load
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredInventory {
    #[serde(default)]
    devices: Vec<Device>,
    #[serde(default)]
    device_types: Vec<DeviceType>,
    #[serde(default)]
    sequences: Sequences,
}

impl TryFrom<StoredInventory> for Inventory {
    type Error = DomainError;

    fn try_from(stored: StoredInventory) -> Result<Self> {
        let mut inventory = Self {
            devices: stored.devices,
            device_types: stored.device_types,
            sequences: stored.sequences,
        };
        inventory.normalize_and_check()?;
        inventory.reconcile();
        Ok(inventory)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Empty inventory holding only the default device type
    pub fn new() -> Self {
        let mut inventory = Self {
            devices: Vec::new(),
            device_types: Vec::new(),
            sequences: Sequences::default(),
        };
        inventory.reconcile();
        inventory
    }

    /// Build from existing records (seed data, imports). Records go through
    /// the same checks as a loaded document; sequences start above the
    /// largest id present.
    pub fn from_parts(devices: Vec<Device>, device_types: Vec<DeviceType>) -> Result<Self> {
        Self::try_from(StoredInventory {
            devices,
            device_types,
            sequences: Sequences::default(),
        })
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device_types(&self) -> &[DeviceType] {
        &self.device_types
    }

    pub fn sequences(&self) -> Sequences {
        self.sequences
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == id)
    }

    pub fn get_device(&self, id: DeviceId) -> Result<&Device> {
        self.device(id)
            .ok_or_else(|| DomainError::device_not_found(id.value()))
    }

    fn device_index(&self, id: DeviceId) -> Result<usize> {
        self.devices
            .iter()
            .position(|device| device.id == id)
            .ok_or_else(|| DomainError::device_not_found(id.value()))
    }

    fn allocate_device_id(&mut self) -> DeviceId {
        let id = DeviceId::new(self.sequences.next_device_id);
        self.sequences.next_device_id += 1;
        id
    }

    fn allocate_device_type_id(&mut self) -> u64 {
        let id = self.sequences.next_device_type_id;
        self.sequences.next_device_type_id += 1;
        id
    }

    /// Trim stored SIMs and reject documents that break the registry
    /// invariants: blank SIMs, duplicate device ids, a SIM on two devices,
    /// duplicate device type ids.
    fn normalize_and_check(&mut self) -> Result<()> {
        let mut ids: HashMap<DeviceId, EntityRef> = HashMap::new();
        let mut sims: HashMap<String, EntityRef> = HashMap::new();

        for device in &mut self.devices {
            device.sim_card = parse_sim(&device.sim_card)?;
            for change in &mut device.history {
                change.old_sim = normalize_sim(&change.old_sim).to_string();
                change.new_sim = normalize_sim(&change.new_sim).to_string();
            }

            if let Some(first) = ids.insert(device.id, device.entity_ref()) {
                return Err(DomainError::conflict(
                    format!("Device id {} is used by more than one device", device.id),
                    first,
                ));
            }
            if let Some(holder) = sims.insert(device.sim_card.clone(), device.entity_ref()) {
                return Err(DomainError::conflict(
                    format!(
                        "SIM {} is held by both {} and {}",
                        device.sim_card, holder.name, device.name
                    ),
                    holder,
                ));
            }
        }

        let mut type_ids = HashSet::new();
        for device_type in &self.device_types {
            if !type_ids.insert(device_type.id) {
                return Err(DomainError::conflict(
                    format!("Device type id {} is used more than once", device_type.id),
                    device_type.entity_ref(),
                ));
            }
        }

        Ok(())
    }

    fn reconcile(&mut self) {
        let max_device_id = self.devices.iter().map(|d| d.id.value()).max().unwrap_or(0);
        self.sequences.next_device_id = self
            .sequences
            .next_device_id
            .max(max_device_id + 1)
            .max(1);

        let max_type_id = self.device_types.iter().map(|t| t.id).max().unwrap_or(0);
        self.sequences.next_device_type_id = self
            .sequences
            .next_device_type_id
            .max(max_type_id + 1)
            .max(1);

        if !self.device_types.iter().any(DeviceType::is_protected) {
            let id = self.allocate_device_type_id();
            self.device_types
                .insert(0, DeviceType::new(id, DEFAULT_DEVICE_TYPE));
        }
    }
}
