mod device_id;
mod entity;
mod filter;
mod history;
mod status;

pub use device_id::DeviceId;
pub use entity::{Device, DeviceDetails, DevicePatch, NewDevice};
pub use filter::{DeviceFilter, DeviceSort};
pub use history::SimChange;
pub use status::DeviceStatus;
