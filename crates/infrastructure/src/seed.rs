use chrono::{DateTime, Utc};
use domain::device::DeviceDetails;
use domain::{Device, DeviceId, DeviceStatus, DeviceType, DomainError, Inventory, SimChange};

fn at(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DomainError::validation("dateAdded", format!("{}: {}", raw, e)))
}

fn change(old_sim: &str, new_sim: &str, changed_at: DateTime<Utc>) -> SimChange {
    SimChange::new(old_sim, new_sim, changed_at)
}

fn device(
    id: u64,
    name: &str,
    sim_card: &str,
    device_type: &str,
    date_added: DateTime<Utc>,
    status: DeviceStatus,
    history: Vec<SimChange>,
) -> Device {
    Device {
        id: DeviceId::new(id),
        name: name.to_string(),
        sim_card: sim_card.to_string(),
        device_type: device_type.to_string(),
        date_added,
        status,
        history,
        details: DeviceDetails::default(),
    }
}

/// Demo inventory used when sample seeding is enabled and nothing is stored yet
pub fn sample_inventory() -> Result<Inventory, DomainError> {
    let devices = vec![
        device(
            1,
            "Security Camera - Front Door",
            "SIM-123456",
            "camera",
            at("2023-05-15T08:30:00Z")?,
            DeviceStatus::Active,
            vec![change("SIM-111111", "SIM-123456", at("2023-08-22T14:30:00Z")?)],
        ),
        device(
            2,
            "Smart Meter - Floor 2",
            "SIM-789012",
            "meter",
            at("2023-06-20T10:15:00Z")?,
            DeviceStatus::Active,
            Vec::new(),
        ),
        device(
            3,
            "Vehicle Tracker - Truck #5",
            "SIM-345678",
            "tracker",
            at("2023-07-10T13:45:00Z")?,
            DeviceStatus::Inactive,
            vec![
                change("SIM-222222", "SIM-345678", at("2023-09-05T09:15:00Z")?),
                change("SIM-345678", "SIM-999999", at("2023-10-12T16:20:00Z")?),
                change("SIM-999999", "SIM-345678", at("2023-11-18T11:30:00Z")?),
            ],
        ),
        device(
            4,
            "POS Terminal - Store #3",
            "SIM-456789",
            "terminal",
            at("2023-08-05T09:00:00Z")?,
            DeviceStatus::Active,
            Vec::new(),
        ),
        device(
            5,
            "Environmental Sensor - Warehouse",
            "SIM-567890",
            "sensor",
            at("2023-09-12T14:20:00Z")?,
            DeviceStatus::Warning,
            vec![change("SIM-000000", "SIM-567890", at("2023-10-01T11:45:00Z")?)],
        ),
    ];

    let device_types = ["other", "camera", "meter", "tracker", "terminal", "sensor"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| DeviceType::new(id, name))
        .collect();

    Inventory::from_parts(devices, device_types)
}
