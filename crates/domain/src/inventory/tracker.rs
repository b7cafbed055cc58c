use chrono::{DateTime, Utc};

use super::Inventory;
use crate::device::{Device, DeviceId, SimChange};
use crate::error::{DomainError, Result};
use crate::sim::{TransferEvent, build_transfer_ledger, parse_sim, query_sim_history, same_sim};

impl Inventory {
    /// Device currently holding `sim`, ignoring `excluding`
    pub fn sim_holder(&self, sim: &str, excluding: Option<DeviceId>) -> Option<&Device> {
        self.devices
            .iter()
            .find(|device| Some(device.id) != excluding && same_sim(&device.sim_card, sim))
    }

    pub(super) fn ensure_sim_available(
        &self,
        sim: &str,
        excluding: Option<DeviceId>,
    ) -> Result<()> {
        match self.sim_holder(sim, excluding) {
            Some(holder) => Err(DomainError::conflict(
                format!("SIM {} is already used by {}", sim, holder.name),
                holder.entity_ref(),
            )),
            None => Ok(()),
        }
    }

    /// Replace a device's SIM and record the change.
    ///
    /// Order of checks: unknown device, blank SIM, SIM held by another device.
    /// Any failure leaves the inventory untouched.
    pub fn change_sim(
        &mut self,
        id: DeviceId,
        new_sim: &str,
        now: DateTime<Utc>,
    ) -> Result<Device> {
        let index = self.device_index(id)?;
        let sim = parse_sim(new_sim)?;
        self.ensure_sim_available(&sim, Some(id))?;

        let device = &mut self.devices[index];
        device.record_sim_change(sim, now);
        Ok(device.clone())
    }

    pub fn device_history(&self, id: DeviceId) -> Result<&[SimChange]> {
        Ok(&self.get_device(id)?.history)
    }

    pub fn transfer_ledger(&self) -> Vec<TransferEvent> {
        build_transfer_ledger(&self.devices)
    }

    pub fn sim_history(&self, sim: &str) -> Vec<TransferEvent> {
        query_sim_history(&self.transfer_ledger(), sim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::NewDevice;
    use crate::error::EntityRef;
    use crate::inventory::RegistryPolicy;
    use crate::sim::TransferKind;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    /// Devices 1 -> SIM-100 and 2 -> SIM-200
    fn two_devices() -> Inventory {
        let mut inventory = Inventory::new();
        let policy = RegistryPolicy::default();
        inventory
            .add_device(NewDevice::new("Camera", "SIM-100"), &policy, now())
            .unwrap();
        inventory
            .add_device(NewDevice::new("Tracker", "SIM-200"), &policy, now())
            .unwrap();
        inventory
    }

    #[test]
    fn test_change_sim_conflict_then_success() {
        let mut inventory = two_devices();
        let device_2 = DeviceId::new(2);

        let err = inventory
            .change_sim(device_2, "SIM-100", now())
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::conflict(
                "SIM SIM-100 is already used by Camera",
                EntityRef::new(1, "Camera")
            )
        );
        let unchanged = inventory.get_device(device_2).unwrap();
        assert_eq!(unchanged.sim_card, "SIM-200");
        assert!(unchanged.history.is_empty());

        let later = now() + Duration::minutes(5);
        let updated = inventory.change_sim(device_2, "SIM-300", later).unwrap();
        assert_eq!(updated.sim_card, "SIM-300");
        assert_eq!(
            updated.history,
            vec![SimChange::new("SIM-200", "SIM-300", later)]
        );
    }

    #[test]
    fn test_change_sim_trims_input() {
        let mut inventory = two_devices();
        let updated = inventory
            .change_sim(DeviceId::new(1), "  SIM-101 ", now())
            .unwrap();

        assert_eq!(updated.sim_card, "SIM-101");
        assert_eq!(updated.history.last().unwrap().new_sim, "SIM-101");
        assert_eq!(updated.history.last().unwrap().old_sim, "SIM-100");
    }

    #[test]
    fn test_change_sim_check_order() {
        let mut inventory = two_devices();

        assert_eq!(
            inventory.change_sim(DeviceId::new(9), "", now()).unwrap_err(),
            DomainError::device_not_found(9)
        );
        assert_eq!(
            inventory.change_sim(DeviceId::new(1), "   ", now()).unwrap_err(),
            DomainError::validation("simCard", "empty SIM")
        );
    }

    #[test]
    fn test_change_sim_to_own_sim_is_recorded() {
        let mut inventory = two_devices();
        let updated = inventory
            .change_sim(DeviceId::new(1), "SIM-100", now())
            .unwrap();
        assert_eq!(updated.history.len(), 1);
        assert_eq!(updated.history[0].old_sim, updated.history[0].new_sim);
    }

    #[test]
    fn test_released_sim_can_move_to_another_device() {
        let mut inventory = two_devices();
        inventory
            .change_sim(DeviceId::new(1), "SIM-150", now())
            .unwrap();
        let moved = inventory
            .change_sim(DeviceId::new(2), "SIM-100", now() + Duration::hours(1))
            .unwrap();
        assert_eq!(moved.sim_card, "SIM-100");

        let history = inventory.sim_history("SIM-100");
        let kinds: Vec<_> = history.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TransferKind::Assigned,
                TransferKind::Removed,
                TransferKind::Assigned
            ]
        );
        assert_eq!(history[2].to_device, Some(EntityRef::new(2, "Tracker")));
    }

    #[test]
    fn test_sims_stay_unique_through_operation_sequence() {
        let mut inventory = two_devices();
        let policy = RegistryPolicy::permissive();
        let attempts = [
            (1, "SIM-200"),
            (2, "SIM-300"),
            (1, "SIM-200"),
            (2, "SIM-100"),
            (2, " SIM-200 "),
            (1, "SIM-300"),
        ];

        for (step, (id, sim)) in attempts.iter().enumerate() {
            let _ = inventory.change_sim(DeviceId::new(*id), sim, now());
            let _ = inventory.add_device(
                NewDevice::new(format!("Extra {step}"), *sim),
                &policy,
                now(),
            );

            let mut sims: Vec<_> = inventory
                .devices()
                .iter()
                .map(|d| d.sim_card.clone())
                .collect();
            let total = sims.len();
            sims.sort();
            sims.dedup();
            assert_eq!(sims.len(), total, "duplicate SIM after step {step}");
        }
    }

    #[test]
    fn test_history_is_append_only() {
        let mut inventory = two_devices();
        let id = DeviceId::new(1);

        inventory.change_sim(id, "SIM-101", now()).unwrap();
        let first = inventory.device_history(id).unwrap().to_vec();

        inventory.toggle_device_status(DeviceId::new(2)).unwrap();
        inventory.delete_device(DeviceId::new(2)).unwrap();
        inventory.change_sim(id, "SIM-102", now()).unwrap();

        let history = inventory.device_history(id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], first[0]);
    }

    #[test]
    fn test_ledger_covers_every_sim_a_device_held() {
        let mut inventory = two_devices();
        let id = DeviceId::new(1);
        inventory.change_sim(id, "SIM-101", now()).unwrap();
        inventory.change_sim(id, "SIM-102", now()).unwrap();

        let ledger = inventory.transfer_ledger();
        assert_eq!(ledger.len(), 1 + 2 * 2 + 1);

        for sim in ["SIM-100", "SIM-101", "SIM-102"] {
            let events = inventory.sim_history(sim);
            assert!(!events.is_empty(), "no events for {sim}");
            assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        }
    }
}
