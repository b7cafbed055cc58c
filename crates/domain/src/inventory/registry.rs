use chrono::{DateTime, Utc};

use super::{DeviceFacets, Inventory, InventoryStats, RegistryPolicy};
use crate::device::{Device, DeviceFilter, DeviceId, DevicePatch, DeviceStatus, NewDevice};
use crate::device_type::DEFAULT_DEVICE_TYPE;
use crate::error::{DomainError, Result};
use crate::sim::parse_sim;

fn parse_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name", "Device name is required"));
    }
    Ok(name.to_string())
}

fn device_type_or_default(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(device_type) if !device_type.is_empty() => device_type.to_string(),
        _ => DEFAULT_DEVICE_TYPE.to_string(),
    }
}

impl Inventory {
    pub fn list_devices(&self, filter: &DeviceFilter) -> Vec<Device> {
        filter.apply(&self.devices)
    }

    /// Register a new device: active, empty history, fresh id.
    pub fn add_device(
        &mut self,
        input: NewDevice,
        policy: &RegistryPolicy,
        now: DateTime<Utc>,
    ) -> Result<Device> {
        let name = parse_name(&input.name)?;
        let sim_card = parse_sim(&input.sim_card)?;
        let date_added = input.date_added.unwrap_or(now);

        self.ensure_sim_available(&sim_card, None)?;
        if policy.enforce_name_date_uniqueness {
            self.ensure_name_date_available(&name, date_added, None)?;
        }

        let device = Device {
            id: self.allocate_device_id(),
            name,
            sim_card,
            device_type: device_type_or_default(input.device_type.as_deref()),
            date_added,
            status: DeviceStatus::Active,
            history: Vec::new(),
            details: input.details,
        };
        self.devices.push(device.clone());
        Ok(device)
    }

    /// Merge `patch` into a device. Status and history are never touched here;
    /// a patched SIM must still be unique but is not recorded as a SIM change.
    pub fn update_device(
        &mut self,
        id: DeviceId,
        patch: DevicePatch,
        policy: &RegistryPolicy,
    ) -> Result<Device> {
        let index = self.device_index(id)?;

        let name = patch.name.as_deref().map(parse_name).transpose()?;
        let sim_card = patch.sim_card.as_deref().map(parse_sim).transpose()?;

        if let Some(sim_card) = &sim_card {
            self.ensure_sim_available(sim_card, Some(id))?;
        }

        let current = &self.devices[index];
        let next_name = name.clone().unwrap_or_else(|| current.name.clone());
        let next_date = patch.date_added.unwrap_or(current.date_added);
        let identity_changed = next_name != current.name || next_date != current.date_added;
        if policy.enforce_name_date_uniqueness && identity_changed {
            self.ensure_name_date_available(&next_name, next_date, Some(id))?;
        }

        let device = &mut self.devices[index];
        device.name = next_name;
        device.date_added = next_date;
        if let Some(sim_card) = sim_card {
            device.sim_card = sim_card;
        }
        if let Some(device_type) = patch.device_type.as_deref() {
            device.device_type = device_type_or_default(Some(device_type));
        }
        device.details.merge(patch.details);

        Ok(device.clone())
    }

    /// Remove a device for good. Its id is not reused.
    pub fn delete_device(&mut self, id: DeviceId) -> Result<Device> {
        let index = self.device_index(id)?;
        Ok(self.devices.remove(index))
    }

    pub fn toggle_device_status(&mut self, id: DeviceId) -> Result<Device> {
        let index = self.device_index(id)?;
        let device = &mut self.devices[index];
        device.status = device.status.toggled();
        Ok(device.clone())
    }

    pub fn stats(&self) -> InventoryStats {
        self.devices
            .iter()
            .fold(InventoryStats::default(), |mut stats, device| {
                stats.total += 1;
                match device.status {
                    DeviceStatus::Active => stats.active += 1,
                    DeviceStatus::Inactive => stats.inactive += 1,
                    DeviceStatus::Warning => stats.warning += 1,
                }
                if device.has_history() {
                    stats.with_history += 1;
                }
                stats
            })
    }

    pub fn facets(&self) -> DeviceFacets {
        let mut facets = DeviceFacets::default();
        for device in &self.devices {
            if !facets.statuses.contains(&device.status) {
                facets.statuses.push(device.status);
            }
            if !facets.device_types.contains(&device.device_type) {
                facets.device_types.push(device.device_type.clone());
            }
        }
        facets
    }

    fn ensure_name_date_available(
        &self,
        name: &str,
        date_added: DateTime<Utc>,
        excluding: Option<DeviceId>,
    ) -> Result<()> {
        let name = name.to_lowercase();
        let day = date_added.date_naive();

        let clash = self.devices.iter().find(|device| {
            Some(device.id) != excluding
                && device.added_on() == day
                && device.name.to_lowercase() == name
        });

        match clash {
            Some(device) => Err(DomainError::conflict(
                format!(
                    "A device named '{}' was already added on {}",
                    device.name, day
                ),
                device.entity_ref(),
            )),
            None => Ok(()),
        }
    }
}
