use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sim_card::{normalize_sim, same_sim};
use crate::device::Device;
use crate::error::EntityRef;

/// How a ledger event reads to an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Assigned,
    Removed,
    Transferred,
}

/// One assignment or removal of a SIM, derived from device state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    pub sim: String,
    pub from_device: Option<EntityRef>,
    pub to_device: Option<EntityRef>,
    pub timestamp: DateTime<Utc>,
}

impl TransferEvent {
    pub fn assigned(sim: impl Into<String>, to: EntityRef, timestamp: DateTime<Utc>) -> Self {
        Self {
            sim: sim.into(),
            from_device: None,
            to_device: Some(to),
            timestamp,
        }
    }

    pub fn removed(sim: impl Into<String>, from: EntityRef, timestamp: DateTime<Utc>) -> Self {
        Self {
            sim: sim.into(),
            from_device: Some(from),
            to_device: None,
            timestamp,
        }
    }

    pub fn kind(&self) -> TransferKind {
        match (&self.from_device, &self.to_device) {
            (None, Some(_)) => TransferKind::Assigned,
            (Some(_), Some(_)) => TransferKind::Transferred,
            (_, None) => TransferKind::Removed,
        }
    }
}

/// Derive the global transfer ledger from device state.
///
/// Per device: one assignment of its original SIM at `date_added`, then for
/// every history entry a removal of the old SIM followed by an assignment of
/// the new one, both at `changed_at`. A device with N history entries
/// contributes exactly `1 + 2N` events. Devices are emitted in input order;
/// callers sort by timestamp when they need chronology.
pub fn build_transfer_ledger(devices: &[Device]) -> Vec<TransferEvent> {
    let mut ledger = Vec::with_capacity(
        devices
            .iter()
            .map(|device| 1 + 2 * device.history.len())
            .sum(),
    );

    for device in devices {
        let holder = device.entity_ref();
        ledger.push(TransferEvent::assigned(
            device.original_sim(),
            holder.clone(),
            device.date_added,
        ));

        for change in &device.history {
            ledger.push(TransferEvent::removed(
                change.old_sim.clone(),
                holder.clone(),
                change.changed_at,
            ));
            ledger.push(TransferEvent::assigned(
                change.new_sim.clone(),
                holder.clone(),
                change.changed_at,
            ));
        }
    }

    ledger
}

/// Sort a ledger by timestamp, ascending. Stable, so events sharing a
/// timestamp keep their emission order (removal before assignment).
pub fn chronological(mut ledger: Vec<TransferEvent>) -> Vec<TransferEvent> {
    ledger.sort_by_key(|event| event.timestamp);
    ledger
}

/// Every event for `sim`, oldest first. A blank key or no match yields an
/// empty result.
pub fn query_sim_history(ledger: &[TransferEvent], sim: &str) -> Vec<TransferEvent> {
    if normalize_sim(sim).is_empty() {
        return Vec::new();
    }

    let matching = ledger
        .iter()
        .filter(|event| same_sim(&event.sim, sim))
        .cloned()
        .collect();

    chronological(matching)
}
