use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use domain::device::{Device, DeviceFilter, DeviceId, DevicePatch, NewDevice, SimChange};
use domain::device_type::DeviceType;
use domain::inventory::{DeviceFacets, Inventory, InventoryStats, InventoryStore, RegistryPolicy};
use domain::sim::{TransferEvent, chronological};
use domain::DomainError;

type Result<T> = std::result::Result<T, DomainError>;

/// Entry point for every registry and SIM tracking use case.
///
/// Mutations are serialized behind one write lock held from the uniqueness
/// check through the store write, so two callers can never both acquire the
/// same SIM. Each mutation runs on a working copy of the document; the copy
/// replaces the live state only once the store accepted it, so a failed save
/// leaves memory and storage in agreement. The save and swap run on their
/// own task, so a caller that stops waiting cannot leave a saved change
/// missing from memory.
pub struct InventoryService {
    inventory: Arc<RwLock<Inventory>>,
    store: Arc<dyn InventoryStore>,
    policy: RegistryPolicy,
}

impl InventoryService {
    pub fn new(
        inventory: Inventory,
        store: Arc<dyn InventoryStore>,
        policy: RegistryPolicy,
    ) -> Self {
        Self {
            inventory: Arc::new(RwLock::new(inventory)),
            store,
            policy,
        }
    }

    /// Load persisted state. An empty store starts from `seed` (persisted
    /// immediately) or from an empty inventory.
    pub async fn open(
        store: Arc<dyn InventoryStore>,
        policy: RegistryPolicy,
        seed: Option<Inventory>,
    ) -> Result<Self> {
        let inventory = match store.load().await? {
            Some(inventory) => {
                info!(
                    devices = inventory.devices().len(),
                    device_types = inventory.device_types().len(),
                    "Inventory loaded"
                );
                inventory
            }
            None => match seed {
                Some(seed) => {
                    store.save(&seed).await?;
                    info!(devices = seed.devices().len(), "Inventory seeded with sample data");
                    seed
                }
                None => {
                    info!("Starting with an empty inventory");
                    Inventory::new()
                }
            },
        };

        Ok(Self::new(inventory, store, policy))
    }

    pub fn policy(&self) -> RegistryPolicy {
        self.policy
    }

    /// Copy of the live document
    pub async fn snapshot(&self) -> Inventory {
        self.inventory.read().await.clone()
    }

    async fn commit<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut Inventory) -> Result<T>,
    ) -> Result<T> {
        let mut live = self.inventory.clone().write_owned().await;
        let mut working = live.clone();

        let value = apply(&mut working)
            .inspect_err(|e| debug!(operation, error = %e, "Mutation rejected"))?;

        let store = self.store.clone();
        let persist = tokio::spawn(async move {
            store.save(&working).await?;
            *live = working;
            Ok::<_, DomainError>(())
        });

        let outcome = persist.await.unwrap_or_else(|e| {
            Err(DomainError::Persistence(format!(
                "Save task for {} did not finish: {}",
                operation, e
            )))
        });
        if let Err(e) = outcome {
            error!(operation, error = %e, "Failed to persist inventory, change rolled back");
            return Err(e);
        }

        Ok(value)
    }

    // --- Device registry ---

    pub async fn list_devices(&self, filter: &DeviceFilter) -> Vec<Device> {
        self.inventory.read().await.list_devices(filter)
    }

    pub async fn get_device(&self, id: DeviceId) -> Result<Device> {
        self.inventory.read().await.get_device(id).cloned()
    }

    pub async fn add_device(&self, input: NewDevice) -> Result<Device> {
        let policy = self.policy;
        let device = self
            .commit("add_device", move |inventory| {
                inventory.add_device(input, &policy, Utc::now())
            })
            .await?;

        info!(
            device_id = %device.id,
            name = %device.name,
            sim = %device.sim_card,
            "Device registered"
        );
        Ok(device)
    }

    pub async fn update_device(&self, id: DeviceId, patch: DevicePatch) -> Result<Device> {
        let policy = self.policy;
        let device = self
            .commit("update_device", move |inventory| {
                inventory.update_device(id, patch, &policy)
            })
            .await?;

        info!(device_id = %id, "Device updated");
        Ok(device)
    }

    pub async fn delete_device(&self, id: DeviceId) -> Result<()> {
        let removed = self
            .commit("delete_device", |inventory| inventory.delete_device(id))
            .await?;

        info!(device_id = %id, sim = %removed.sim_card, "Device deleted");
        Ok(())
    }

    pub async fn toggle_device_status(&self, id: DeviceId) -> Result<Device> {
        let device = self
            .commit("toggle_device_status", |inventory| {
                inventory.toggle_device_status(id)
            })
            .await?;

        info!(device_id = %id, status = %device.status, "Device status toggled");
        Ok(device)
    }

    pub async fn stats(&self) -> InventoryStats {
        self.inventory.read().await.stats()
    }

    pub async fn facets(&self) -> DeviceFacets {
        self.inventory.read().await.facets()
    }

    // --- SIM tracking ---

    pub async fn change_sim(&self, id: DeviceId, new_sim: &str) -> Result<Device> {
        let device = self
            .commit("change_sim", |inventory| {
                inventory.change_sim(id, new_sim, Utc::now())
            })
            .await?;

        if let Some(change) = device.history.last() {
            info!(
                device_id = %id,
                old_sim = %change.old_sim,
                new_sim = %change.new_sim,
                "SIM changed"
            );
        }
        Ok(device)
    }

    pub async fn device_history(&self, id: DeviceId) -> Result<Vec<SimChange>> {
        self.inventory
            .read()
            .await
            .device_history(id)
            .map(<[SimChange]>::to_vec)
    }

    /// Ledger events for one SIM, or the whole ledger, oldest first
    pub async fn transfer_ledger(&self, sim: Option<&str>) -> Vec<TransferEvent> {
        let inventory = self.inventory.read().await;
        match sim {
            Some(sim) => inventory.sim_history(sim),
            None => chronological(inventory.transfer_ledger()),
        }
    }

    // --- Device types ---

    pub async fn list_device_types(&self) -> Vec<DeviceType> {
        self.inventory.read().await.device_types().to_vec()
    }

    pub async fn add_device_type(&self, name: &str) -> Result<DeviceType> {
        let device_type = self
            .commit("add_device_type", |inventory| inventory.add_device_type(name))
            .await?;

        info!(device_type_id = device_type.id, name = %device_type.name, "Device type created");
        Ok(device_type)
    }

    pub async fn rename_device_type(&self, id: u64, name: &str) -> Result<DeviceType> {
        let device_type = self
            .commit("rename_device_type", |inventory| {
                inventory.rename_device_type(id, name)
            })
            .await?;

        info!(device_type_id = id, name = %device_type.name, "Device type renamed");
        Ok(device_type)
    }

    pub async fn remove_device_type(&self, id: u64) -> Result<()> {
        let removed = self
            .commit("remove_device_type", |inventory| {
                inventory.remove_device_type(id)
            })
            .await?;

        info!(device_type_id = id, name = %removed.name, "Device type removed");
        Ok(())
    }
}
