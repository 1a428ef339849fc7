//! Vendor extension device info
//!
//! Sony cameras answer `SdioGetExtDeviceInfo` with a short supplementary
//! dataset listing codes the standard device info leaves out:
//!
//! ```text
//! version (u16) | count (u32) | codes (u16…) [| count (u32) | controls (u16…)]
//! ```
//!
//! The codes mix operations, events and properties; the space bits of each
//! code say which. See [`DeviceInfo::merge`](crate::DeviceInfo::merge).

use ptpip_core::ByteBuffer;

use crate::error::{Error, Result};

/// Supplementary capability list from a vendor query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtDeviceInfo {
    /// Extension dataset version, echoing the request argument
    pub version: u16,

    /// Operation, event and property codes to add to the device info
    pub codes: Vec<u16>,

    /// Control codes, present on newer bodies only
    pub controls: Vec<u16>,
}

impl ExtDeviceInfo {
    /// Decode the dataset carried by the data phase
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the version or the code list is missing.
    /// A missing or truncated control list is treated as empty.
    pub fn decode(buffer: &ByteBuffer) -> Result<Self> {
        let mut offset = 0;
        let version: u16 = buffer
            .read(&mut offset)
            .ok_or(Error::Decode("extension info version"))?;
        let codes = buffer
            .read_array(&mut offset)
            .ok_or(Error::Decode("extension info codes"))?;
        let controls = buffer.read_array(&mut offset).unwrap_or_default();

        Ok(Self {
            version,
            codes,
            controls,
        })
    }

    /// Append the encoded dataset
    pub fn encode(&self, buffer: &mut ByteBuffer) {
        buffer.append(self.version);
        buffer.append_array(&self.codes);
        if !self.controls.is_empty() {
            buffer.append_array(&self.controls);
        }
    }
}
