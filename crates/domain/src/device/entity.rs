use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{DeviceId, DeviceStatus, SimChange};
use crate::device_type::DEFAULT_DEVICE_TYPE;
use crate::error::EntityRef;

/// A physical unit under management (camera, sensor, tracker, meter, terminal...).
///
/// Devices are owned by the [`Inventory`](crate::inventory::Inventory); outside
/// of it callers only ever see clones, so the SIM uniqueness rule and the
/// append-only history cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    /// Currently assigned SIM, stored trimmed
    pub sim_card: String,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub history: Vec<SimChange>,
    #[serde(flatten)]
    pub details: DeviceDetails,
}

pub(crate) fn default_device_type() -> String {
    DEFAULT_DEVICE_TYPE.to_string()
}

impl Device {
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.id.value(), self.name.clone())
    }

    /// SIM the device carried when it was registered
    pub fn original_sim(&self) -> &str {
        self.history
            .first()
            .map(|change| change.old_sim.as_str())
            .unwrap_or(&self.sim_card)
    }

    /// Calendar day (UTC) the device was added on
    pub fn added_on(&self) -> NaiveDate {
        self.date_added.date_naive()
    }

    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    /// Case-insensitive substring match against name or SIM
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term) || self.sim_card.to_lowercase().contains(&term)
    }

    pub(crate) fn record_sim_change(&mut self, new_sim: String, changed_at: DateTime<Utc>) {
        let old_sim = std::mem::replace(&mut self.sim_card, new_sim.clone());
        self.history.push(SimChange::new(old_sim, new_sim, changed_at));
    }
}

/// Optional descriptive fields some devices carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_connection: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<String>,
}

impl DeviceDetails {
    /// Overwrite the fields that are set in `patch`
    pub fn merge(&mut self, patch: DeviceDetails) {
        if patch.manufacturer.is_some() {
            self.manufacturer = patch.manufacturer;
        }
        if patch.firmware.is_some() {
            self.firmware = patch.firmware;
        }
        if patch.last_connection.is_some() {
            self.last_connection = patch.last_connection;
        }
        if patch.signal_strength.is_some() {
            self.signal_strength = patch.signal_strength;
        }
    }
}

/// Input of the create operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sim_card: String,
    #[serde(default)]
    pub device_type: Option<String>,
    /// Explicit registration time; defaults to now
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub details: DeviceDetails,
}

impl NewDevice {
    pub fn new(name: impl Into<String>, sim_card: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sim_card: sim_card.into(),
            ..Default::default()
        }
    }

    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    pub fn with_date_added(mut self, date_added: DateTime<Utc>) -> Self {
        self.date_added = Some(date_added);
        self
    }
}

/// Partial update; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sim_card: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub details: DeviceDetails,
}

impl DevicePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn sim_card(sim_card: impl Into<String>) -> Self {
        Self {
            sim_card: Some(sim_card.into()),
            ..Default::default()
        }
    }
}
