use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Device, DeviceStatus};

/// Ordering applied by `list_devices`; insertion order when absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSort {
    /// Most recently added first
    Newest,
    Oldest,
    /// Case-insensitive by name
    Name,
}

/// Query-string criteria; a blank `status` or `sort` means "not given"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<DeviceStatus>,
    #[serde(default)]
    pub device_type: Option<String>,
    /// Case-insensitive substring of name or SIM
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sort: Option<DeviceSort>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let value: StrDeserializer<'_, D::Error> = value.into_deserializer();
            T::deserialize(value).map(Some)
        }
    }
}

impl DeviceFilter {
    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sorted_by(mut self, sort: DeviceSort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn matches(&self, device: &Device) -> bool {
        if let Some(status) = self.status {
            if device.status != status {
                return false;
            }
        }

        if let Some(device_type) = self.device_type.as_deref().filter(|t| !t.is_empty()) {
            if device.device_type != device_type {
                return false;
            }
        }

        match self.search.as_deref() {
            Some(term) => device.matches_search(term),
            None => true,
        }
    }

    /// Filter and order a device collection
    pub fn apply<'a, I>(&self, devices: I) -> Vec<Device>
    where
        I: IntoIterator<Item = &'a Device>,
    {
        let mut result: Vec<Device> = devices
            .into_iter()
            .filter(|device| self.matches(device))
            .cloned()
            .collect();

        match self.sort {
            Some(DeviceSort::Newest) => result.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
            Some(DeviceSort::Oldest) => result.sort_by(|a, b| a.date_added.cmp(&b.date_added)),
            Some(DeviceSort::Name) => {
                result.sort_by_key(|device| device.name.to_lowercase());
            }
            None => {}
        }

        result
    }
}
