use serde::{Deserialize, Serialize};

use crate::device::DeviceStatus;

/// Dashboard counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub warning: usize,
    /// Devices that went through at least one SIM change
    pub with_history: usize,
}

/// Distinct values present among devices, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFacets {
    pub statuses: Vec<DeviceStatus>,
    pub device_types: Vec<String>,
}
