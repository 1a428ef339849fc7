//! # ptpip-core
//!
//! Core protocol implementation for PTP/IP (Picture Transfer Protocol over
//! TCP/IP) cameras.
//!
//! This crate provides the low-level protocol primitives:
//! - Little-endian byte buffer with sparse writes and string codecs
//! - Typed value codec for every fixed-width integer
//! - Operation, response, event, property and format code spaces
//! - Packet framing, the inbound packet variants and outbound constructors
//! - An incremental accumulator that reassembles packets from a byte stream
//!
//! Parsing never fails loudly: `None` means "not enough bytes yet" and the
//! caller retries once more input arrives.

pub mod buffer;
pub mod code;
pub mod constants;
pub mod error;
pub mod packet;
pub mod stream;
pub mod value;

pub use buffer::{ByteBuffer, CharEncoding, StringFraming};
pub use code::{CommandCode, EventCode, FileFormat, PropertyCode, ResponseCode};
pub use error::{Error, Result};
pub use packet::{
    CommandRequestPacket, CommandResponsePacket, DataPacket, EndDataPacket, EventPacket,
    GenericPacket, InitCommandAckPacket, OutboundPacket, Packet, PacketName, Packetable,
    ResyncPacket, StartDataPacket, Transactional,
};
pub use stream::PacketStream;
pub use value::TypedValue;
