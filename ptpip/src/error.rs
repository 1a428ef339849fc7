//! High-level error types

use ptpip_core::{PacketName, ResponseCode};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] ptpip_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] ptpip_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] ptpip_types::Error),

    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),

    /// Responder refused the init request
    #[error("Initialization refused (reason: {reason:?})")]
    InitFailed { reason: Option<u32> },

    /// Device answered with a non-OK response code
    #[error("Device returned {code}")]
    Device { code: ResponseCode },

    /// Command response whose code could not be read
    #[error("Malformed response for transaction {transaction_id}")]
    MalformedResponse { transaction_id: u32 },

    #[error("Unexpected packet: {0}")]
    UnexpectedPacket(PacketName),
}

impl Error {
    /// Check if retrying the same operation may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Core(e) => e.is_recoverable(),
            Error::Transport(e) => e.is_recoverable(),
            Error::Device { code } => *code == ResponseCode::DeviceBusy,
            _ => false,
        }
    }
}
