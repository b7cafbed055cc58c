use serde::{Deserialize, Serialize};

use crate::error::EntityRef;

/// Name of the protected default device type
pub const DEFAULT_DEVICE_TYPE: &str = "other";

/// Named category label for devices, unique by exact name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    pub id: u64,
    pub name: String,
}

impl DeviceType {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The default type can be neither removed nor renamed
    pub fn is_protected(&self) -> bool {
        self.name == DEFAULT_DEVICE_TYPE
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.id, self.name.clone())
    }
}
