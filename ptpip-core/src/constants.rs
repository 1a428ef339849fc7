//! Protocol constants

use std::time::Duration;

/// Default PTP/IP TCP port
pub const DEFAULT_PORT: u16 = 15740;

/// Length + kind tag preceding every packet body
pub const HEADER_SIZE: usize = 8;

/// Default timeout for a single packet exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Protocol version announced in the init command request (1.0)
pub const PROTOCOL_VERSION: u32 = 0x0001_0000;

/// Length of the initiator/responder GUID
pub const GUID_SIZE: usize = 16;

/// Longest friendly name sent in an init command request, in code units
pub const MAX_FRIENDLY_NAME: usize = 80;

/// Outbound payloads smaller than this ride in the end-data packet instead
/// of a separate data packet
pub const SMALL_PAYLOAD_THRESHOLD: usize = 128;

/// Default limit on bytes an accumulator holds while waiting for a boundary
pub const DEFAULT_MAX_BUFFERED: usize = 64 * 1024 * 1024;

/// Largest declared length a single packet can carry
pub const MAX_PACKET_LENGTH: usize = u32::MAX as usize;

/// Data phase word of a command request
pub mod data_phase {
    /// No data phase, or device to initiator
    pub const NO_DATA_OR_DATA_IN: u32 = 1;

    /// Initiator to device
    pub const DATA_OUT: u32 = 2;
}

/// Fixed body offsets
pub mod offsets {
    /// Transaction id inside a command response body
    pub const RESPONSE_TRANSACTION_ID: usize = 2;

    /// Parameters inside a command response body
    pub const RESPONSE_PARAMETERS: usize = 6;

    /// Payload inside a data or end-data body
    pub const DATA_PAYLOAD: usize = 4;

    /// Name inside an init command ack body
    pub const INIT_ACK_NAME: usize = 16;
}
