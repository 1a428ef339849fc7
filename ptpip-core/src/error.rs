//! Error types for ptpip-core
//!
//! Packet and value parsing never produces these: an unparseable input is
//! reported as `None` so the caller can wait for more bytes. The variants
//! below cover the conversions and limits a caller can act on.

/// Result type alias for ptpip-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Packet kind tag is not part of the PTP/IP set
    #[error("Unknown packet kind: 0x{0:08X}")]
    UnknownPacketName(u32),

    /// Hex input could not be decoded
    #[error("Invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Accumulated bytes exceed the configured limit
    #[error("Buffer overflow: {size} bytes buffered (max: {max} bytes)")]
    BufferOverflow {
        size: usize,
        max: usize,
    },

    /// Payload does not fit in a single packet length field
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
}

impl Error {
    /// Check if error is recoverable (dropping buffered input might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::BufferOverflow { .. })
    }
}
