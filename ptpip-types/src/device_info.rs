//! Device info dataset
//!
//! The answer to `GetDeviceInfo`. Every field is positional and the strings
//! and arrays are self-describing, so one bad field makes everything after
//! it unreadable. The trailing model, version and serial fields may
//! therefore be missing while the rest of the record is fine.

use std::fmt;

use ptpip_core::{
    ByteBuffer, CharEncoding, CommandCode, EventCode, FileFormat, PropertyCode, StringFraming,
};
use tracing::debug;

use crate::{
    error::{Error, Result},
    ext_device_info::ExtDeviceInfo,
};

/// Device information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// PTP standard version, in hundredths
    pub version: u16,

    pub vendor_extension_id: u32,
    pub vendor_extension_version: u16,
    pub vendor_extension_description: String,
    pub functional_mode: u16,

    pub operations: Vec<CommandCode>,
    pub events: Vec<EventCode>,
    pub properties: Vec<PropertyCode>,
    pub capture_formats: Vec<FileFormat>,
    pub image_formats: Vec<FileFormat>,

    pub manufacturer: String,

    /// Device model (absent when the record was cut short)
    pub model: Option<String>,

    /// Firmware version
    pub device_version: Option<String>,

    pub serial_number: Option<String>,
}

fn read_string(buffer: &ByteBuffer, offset: &mut usize) -> Option<String> {
    buffer.read_string(offset, StringFraming::Counted, CharEncoding::Utf16)
}

fn read_codes<C: From<u16>>(
    buffer: &ByteBuffer,
    offset: &mut usize,
    field: &'static str,
) -> Result<Vec<C>> {
    let raw: Vec<u16> = buffer.read_array(offset).ok_or(Error::Decode(field))?;
    Ok(raw.into_iter().map(C::from).collect())
}

fn append_codes<C: Copy + Into<u16>>(buffer: &mut ByteBuffer, codes: &[C]) {
    let raw: Vec<u16> = codes.iter().map(|code| (*code).into()).collect();
    buffer.append_array(&raw);
}

impl DeviceInfo {
    /// Decode the dataset
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] naming the first field that could not be read,
    /// unless that field is one of the trailing model, device version or
    /// serial number fields. Those decode to `None` from the first missing
    /// one onwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptpip_core::{ByteBuffer, CommandCode};
    /// use ptpip_types::DeviceInfo;
    ///
    /// let mut info = DeviceInfo::new("Sony Corporation");
    /// info.operations.push(CommandCode::GetDeviceInfo);
    ///
    /// let mut buffer = ByteBuffer::new();
    /// info.encode(&mut buffer);
    ///
    /// let decoded = DeviceInfo::decode(&buffer).unwrap();
    /// assert!(decoded.supports_operation(CommandCode::GetDeviceInfo));
    /// assert_eq!(decoded.model, None);
    /// ```
    pub fn decode(buffer: &ByteBuffer) -> Result<Self> {
        let mut offset = 0;

        let version = buffer.read(&mut offset).ok_or(Error::Decode("version"))?;
        let vendor_extension_id = buffer
            .read(&mut offset)
            .ok_or(Error::Decode("vendor extension id"))?;
        let vendor_extension_version = buffer
            .read(&mut offset)
            .ok_or(Error::Decode("vendor extension version"))?;
        let vendor_extension_description = read_string(buffer, &mut offset)
            .ok_or(Error::Decode("vendor extension description"))?;
        let functional_mode = buffer
            .read(&mut offset)
            .ok_or(Error::Decode("functional mode"))?;

        let operations = read_codes(buffer, &mut offset, "supported operations")?;
        let events = read_codes(buffer, &mut offset, "supported events")?;
        let properties = read_codes(buffer, &mut offset, "supported properties")?;
        let capture_formats = read_codes(buffer, &mut offset, "capture formats")?;
        let image_formats = read_codes(buffer, &mut offset, "image formats")?;

        let manufacturer =
            read_string(buffer, &mut offset).ok_or(Error::Decode("manufacturer"))?;

        let model = read_string(buffer, &mut offset);
        let device_version = model.as_ref().and_then(|_| read_string(buffer, &mut offset));
        let serial_number = device_version
            .as_ref()
            .and_then(|_| read_string(buffer, &mut offset));
        if serial_number.is_none() {
            debug!("Device info ends early at offset {}", offset);
        }

        Ok(Self {
            version,
            vendor_extension_id,
            vendor_extension_version,
            vendor_extension_description,
            functional_mode,
            operations,
            events,
            properties,
            capture_formats,
            image_formats,
            manufacturer,
            model,
            device_version,
            serial_number,
        })
    }

    /// Create an empty record for `manufacturer`
    pub fn new(manufacturer: impl Into<String>) -> Self {
        Self {
            version: 100,
            vendor_extension_id: 0,
            vendor_extension_version: 0,
            vendor_extension_description: String::new(),
            functional_mode: 0,
            operations: Vec::new(),
            events: Vec::new(),
            properties: Vec::new(),
            capture_formats: Vec::new(),
            image_formats: Vec::new(),
            manufacturer: manufacturer.into(),
            model: None,
            device_version: None,
            serial_number: None,
        }
    }

    /// Append the encoded dataset
    ///
    /// Trailing optional strings are written up to the first `None`.
    pub fn encode(&self, buffer: &mut ByteBuffer) {
        let write = |buffer: &mut ByteBuffer, text: &str| {
            buffer.append_string(text, StringFraming::Counted, CharEncoding::Utf16)
        };

        buffer.append(self.version);
        buffer.append(self.vendor_extension_id);
        buffer.append(self.vendor_extension_version);
        write(buffer, &self.vendor_extension_description);
        buffer.append(self.functional_mode);

        append_codes(buffer, &self.operations);
        append_codes(buffer, &self.events);
        append_codes(buffer, &self.properties);
        append_codes(buffer, &self.capture_formats);
        append_codes(buffer, &self.image_formats);

        write(buffer, &self.manufacturer);
        for field in [&self.model, &self.device_version, &self.serial_number] {
            match field {
                Some(text) => write(buffer, text),
                None => break,
            }
        }
    }

    /// Fold a vendor extension list into the capability lists
    ///
    /// Each code goes to operations, events or properties by its space bits;
    /// codes from any other space are ignored. Codes already listed are not
    /// added twice.
    pub fn merge(&mut self, ext: &ExtDeviceInfo) {
        for &raw in &ext.codes {
            if CommandCode::in_space(raw) {
                push_unique(&mut self.operations, CommandCode::from(raw));
            } else if EventCode::in_space(raw) {
                push_unique(&mut self.events, EventCode::from(raw));
            } else if PropertyCode::in_space(raw) {
                push_unique(&mut self.properties, PropertyCode::from(raw));
            }
        }
    }

    pub fn supports_operation(&self, code: CommandCode) -> bool {
        self.operations.contains(&code)
    }

    pub fn supports_event(&self, code: EventCode) -> bool {
        self.events.contains(&code)
    }

    pub fn supports_property(&self, code: PropertyCode) -> bool {
        self.properties.contains(&code)
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if !list.contains(&value) {
        list.push(value);
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device[{} {}, ops: {}, props: {}]",
            self.manufacturer,
            self.model.as_deref().unwrap_or("?"),
            self.operations.len(),
            self.properties.len()
        )
    }
}
