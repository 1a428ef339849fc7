//! # ptpip-types
//!
//! Typed datasets carried in PTP data phases: device property descriptors,
//! the device info record and the vendor extension info that supplements it.
//!
//! Everything here decodes from a [`ptpip_core::ByteBuffer`] using the same
//! cursor conventions as the packet layer.

pub mod device_info;
pub mod error;
pub mod ext_device_info;
pub mod property;

#[cfg(test)]
mod fixtures;

pub use device_info::DeviceInfo;
pub use error::{Error, Result};
pub use ext_device_info::ExtDeviceInfo;
pub use property::{
    decode_all_properties, AnyDeviceProperty, Availability, DataType, DeviceProperty,
    EnumProperty, Form, GetSet, OtherProperty, PropertyHeader, PropertyValue, RangeProperty,
    StringProperty,
};
