use serde::{Deserialize, Serialize};

/// Device operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Device is in service
    #[default]
    Active,
    /// Device was switched off by an operator
    Inactive,
    /// Device needs attention; never entered by toggling
    Warning,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Warning => "warning",
        }
    }

    /// Binary toggle: active becomes inactive, anything else becomes active
    pub fn toggled(&self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive | Self::Warning => Self::Active,
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
