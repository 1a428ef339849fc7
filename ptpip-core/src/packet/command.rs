//! Command request packet (outbound only)

use std::fmt;

use crate::{code::CommandCode, constants::data_phase};

use super::{OutboundPacket, PacketName};

/// Most parameters a PTP operation carries
pub const MAX_ARGUMENTS: usize = 5;

/// Operation request sent on the command channel
///
/// # Packet Structure
///
/// ```text
/// ┌────────────┬──────────┬────────────────┬──────────────────┐
/// │ Data phase │   Code   │ Transaction id │    Arguments     │
/// │  LE u32    │  LE u16  │    LE u32      │  0..5 × LE u32   │
/// └────────────┴──────────┴────────────────┴──────────────────┘
/// ```
///
/// # Examples
///
/// ```
/// use ptpip_core::{CommandCode, CommandRequestPacket};
///
/// let request = CommandRequestPacket::new(CommandCode::OpenSession, 0)
///     .with_arguments(&[1]);
/// let packet = request.encode();
/// assert_eq!(packet.len(), 8 + 4 + 2 + 4 + 4);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CommandRequestPacket {
    pub code: CommandCode,
    pub transaction_id: u32,
    pub arguments: Vec<u32>,

    /// Data phase word, see [`crate::constants::data_phase`]
    pub data_phase: u32,
}

impl CommandRequestPacket {
    /// Create a request with no arguments and no outgoing data
    pub fn new(code: CommandCode, transaction_id: u32) -> Self {
        Self {
            code,
            transaction_id,
            arguments: Vec::new(),
            data_phase: data_phase::NO_DATA_OR_DATA_IN,
        }
    }

    /// Set the operation arguments (at most five are kept)
    pub fn with_arguments(mut self, arguments: &[u32]) -> Self {
        self.arguments = arguments.iter().copied().take(MAX_ARGUMENTS).collect();
        self
    }

    /// Announce that a data phase from the initiator follows
    pub fn with_outgoing_data(mut self) -> Self {
        self.data_phase = data_phase::DATA_OUT;
        self
    }

    /// Encode with a complete header
    pub fn encode(&self) -> OutboundPacket {
        OutboundPacket::from_body(PacketName::CommandRequest, |buffer| {
            buffer.append(self.data_phase);
            buffer.append(u16::from(self.code));
            buffer.append(self.transaction_id);
            for argument in &self.arguments {
                buffer.append(*argument);
            }
        })
    }
}

impl fmt::Debug for CommandRequestPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRequestPacket")
            .field("code", &self.code)
            .field("transaction_id", &self.transaction_id)
            .field("arguments", &self.arguments)
            .field("data_phase", &self.data_phase)
            .finish()
    }
}

impl fmt::Display for CommandRequestPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CommandRequest[{}](txn={}, args={})",
            self.code,
            self.transaction_id,
            self.arguments.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_request_layout() {
        let packet = CommandRequestPacket::new(CommandCode::GetDeviceInfo, 1).encode();
        assert_eq!(
            packet.to_bytes().as_ref(),
            &[
                0x12, 0, 0, 0, 0x06, 0, 0, 0, // header
                0x01, 0, 0, 0, // data phase
                0x01, 0x10, // code
                0x01, 0, 0, 0, // transaction id
            ][..]
        );
    }

    #[test]
    fn test_command_request_arguments() {
        let request = CommandRequestPacket::new(CommandCode::SdioConnect, 3)
            .with_arguments(&[1, 0, 0])
            .with_outgoing_data();
        let packet = request.encode();
        let buffer = packet.as_buffer();

        assert_eq!(packet.len(), 18 + 12);
        assert_eq!(buffer.read_at::<u32>(8), Some(data_phase::DATA_OUT));
        assert_eq!(buffer.read_at::<u16>(12), Some(0x9201));
        assert_eq!(buffer.read_at::<u32>(14), Some(3));
        assert_eq!(buffer.read_at::<u32>(18), Some(1));
    }

    #[test]
    fn test_argument_limit() {
        let request = CommandRequestPacket::new(CommandCode::GetObject, 1)
            .with_arguments(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(request.arguments, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_display() {
        let request = CommandRequestPacket::new(CommandCode::OpenSession, 0).with_arguments(&[1]);
        assert_eq!(request.to_string(), "CommandRequest[OpenSession(0x1002)](txn=0, args=1)");
    }
}
