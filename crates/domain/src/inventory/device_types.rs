use super::Inventory;
use crate::device_type::DeviceType;
use crate::error::{DomainError, Result};

fn parse_type_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name", "Device type name is required"));
    }
    Ok(name.to_string())
}

impl Inventory {
    pub fn add_device_type(&mut self, name: &str) -> Result<DeviceType> {
        let name = parse_type_name(name)?;
        self.ensure_type_name_available(&name, None)?;

        let device_type = DeviceType::new(self.allocate_device_type_id(), name);
        self.device_types.push(device_type.clone());
        Ok(device_type)
    }

    pub fn rename_device_type(&mut self, id: u64, name: &str) -> Result<DeviceType> {
        let index = self.device_type_index(id)?;
        Self::ensure_not_protected(&self.device_types[index])?;

        let name = parse_type_name(name)?;
        self.ensure_type_name_available(&name, Some(id))?;

        let device_type = &mut self.device_types[index];
        device_type.name = name;
        Ok(device_type.clone())
    }

    /// Devices tagged with the removed type keep their tag.
    pub fn remove_device_type(&mut self, id: u64) -> Result<DeviceType> {
        let index = self.device_type_index(id)?;
        Self::ensure_not_protected(&self.device_types[index])?;
        Ok(self.device_types.remove(index))
    }

    fn device_type_index(&self, id: u64) -> Result<usize> {
        self.device_types
            .iter()
            .position(|device_type| device_type.id == id)
            .ok_or_else(|| DomainError::device_type_not_found(id))
    }

    fn ensure_not_protected(device_type: &DeviceType) -> Result<()> {
        if device_type.is_protected() {
            return Err(DomainError::conflict(
                format!("Device type '{}' is protected", device_type.name),
                device_type.entity_ref(),
            ));
        }
        Ok(())
    }

    /// Names are unique by exact, case-sensitive match
    fn ensure_type_name_available(&self, name: &str, excluding: Option<u64>) -> Result<()> {
        match self
            .device_types
            .iter()
            .find(|t| Some(t.id) != excluding && t.name == name)
        {
            Some(existing) => Err(DomainError::conflict(
                format!("Device type '{}' already exists", existing.name),
                existing.entity_ref(),
            )),
            None => Ok(()),
        }
    }
}
