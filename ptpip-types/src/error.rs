//! Error types for ptpip-types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown property data type: 0x{0:04X}")]
    UnknownDataType(u16),

    #[error("Unknown property form flag: 0x{0:02X}")]
    UnknownForm(u8),

    #[error("Could not decode {0}")]
    Decode(&'static str),
}
