use serde::{Deserialize, Serialize};

/// Optional registry rules, set from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryPolicy {
    /// Reject two devices with the same name (case-insensitive) added on the
    /// same UTC calendar day
    #[serde(default = "default_enforce_name_date_uniqueness")]
    pub enforce_name_date_uniqueness: bool,
}

fn default_enforce_name_date_uniqueness() -> bool {
    true
}

impl Default for RegistryPolicy {
    fn default() -> Self {
        Self {
            enforce_name_date_uniqueness: default_enforce_name_date_uniqueness(),
        }
    }
}

impl RegistryPolicy {
    /// Only the SIM uniqueness invariant applies
    pub fn permissive() -> Self {
        Self {
            enforce_name_date_uniqueness: false,
        }
    }
}
