use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded SIM replacement on a device. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimChange {
    pub old_sim: String,
    pub new_sim: String,
    pub changed_at: DateTime<Utc>,
}

impl SimChange {
    pub fn new(
        old_sim: impl Into<String>,
        new_sim: impl Into<String>,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            old_sim: old_sim.into(),
            new_sim: new_sim.into(),
            changed_at,
        }
    }
}
