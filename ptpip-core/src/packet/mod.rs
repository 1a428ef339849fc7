//! PTP/IP packets
//!
//! # Packet Structure
//!
//! ```text
//! ┌─────────────┬─────────────┬──────────────────────────────┐
//! │   Length    │    Kind     │             Body             │
//! │   4 bytes   │   4 bytes   │      Length - 8 bytes        │
//! │  (LE u32)   │  (LE u32)   │    (kind specific layout)    │
//! └─────────────┴─────────────┴──────────────────────────────┘
//! ```
//!
//! The declared length includes the 8 byte header. Some devices get it
//! wrong, so variants that can be misled by it (command responses, the
//! vendor resync packet) recompute their own length and report it through
//! [`Packetable::length`]. Callers must always advance by that value, never
//! by the header field.

mod command;
mod data;
mod event;
mod framing;
mod init;
mod outbound;
mod response;
mod resync;

use std::fmt;

use tracing::trace;

use crate::{
    buffer::ByteBuffer,
    constants::HEADER_SIZE,
    error::{Error, Result},
};

pub use command::CommandRequestPacket;
pub use data::{DataPacket, EndDataPacket, StartDataPacket};
pub use event::EventPacket;
pub use init::InitCommandAckPacket;
pub use outbound::OutboundPacket;
pub use response::CommandResponsePacket;
pub use resync::ResyncPacket;

/// Packet kind tag
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PacketName {
    Unknown = 0,
    InitCommandRequest = 1,
    InitCommandAck = 2,
    InitEventRequest = 3,
    InitEventAck = 4,
    InitFail = 5,
    CommandRequest = 6,
    CommandResponse = 7,
    Event = 8,
    StartData = 9,
    Data = 10,
    CancelTransaction = 11,
    EndData = 12,
    Ping = 13,
    Pong = 14,

    /// Undocumented Sony kind whose length field routinely swallows the
    /// packet after it
    VendorResync = 0x0000_FFFF,
}

impl PacketName {
    /// Check if the tag names a real packet kind (anything but `Unknown`)
    pub fn is_valid(self) -> bool {
        self != Self::Unknown
    }
}

impl TryFrom<u32> for PacketName {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        let name = match value {
            0 => Self::Unknown,
            1 => Self::InitCommandRequest,
            2 => Self::InitCommandAck,
            3 => Self::InitEventRequest,
            4 => Self::InitEventAck,
            5 => Self::InitFail,
            6 => Self::CommandRequest,
            7 => Self::CommandResponse,
            8 => Self::Event,
            9 => Self::StartData,
            10 => Self::Data,
            11 => Self::CancelTransaction,
            12 => Self::EndData,
            13 => Self::Ping,
            14 => Self::Pong,
            0xFFFF => Self::VendorResync,
            other => return Err(Error::UnknownPacketName(other)),
        };
        Ok(name)
    }
}

impl From<PacketName> for u32 {
    fn from(name: PacketName) -> u32 {
        name as u32
    }
}

impl fmt::Display for PacketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The header contract every inbound packet satisfies
pub trait Packetable {
    /// Packet kind
    fn name(&self) -> PacketName;

    /// Wire length including the header, as this packet consumed it
    fn length(&self) -> u32;

    /// Body bytes the variant did not decode into fields
    fn data(&self) -> &ByteBuffer;
}

/// A packet correlated to a command by a transaction id
pub trait Transactional: Packetable {
    /// Transaction id, if the body carried one
    fn transaction_id(&self) -> Option<u32>;
}

/// Shell for packet kinds without a dedicated variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericPacket {
    pub name: PacketName,
    pub length: u32,
    pub data: ByteBuffer,
}

impl GenericPacket {
    /// Wrap an unparsed body
    ///
    /// Needs the complete body. The reported length is never less than the
    /// header so framing always makes progress.
    pub fn new(length: u32, name: PacketName, data: ByteBuffer) -> Option<Self> {
        if !body_complete(length, &data) {
            return None;
        }
        Some(Self {
            name,
            length: length.max(HEADER_SIZE as u32),
            data,
        })
    }
}

impl Packetable for GenericPacket {
    fn name(&self) -> PacketName {
        self.name
    }

    fn length(&self) -> u32 {
        self.length
    }

    fn data(&self) -> &ByteBuffer {
        &self.data
    }
}

/// Any inbound packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Generic(GenericPacket),
    CommandResponse(CommandResponsePacket),
    StartData(StartDataPacket),
    Data(DataPacket),
    EndData(EndDataPacket),
    Event(EventPacket),
    InitCommandAck(InitCommandAckPacket),
    Resync(ResyncPacket),
}

/// Signature shared by every registered variant constructor
type Constructor = fn(u32, PacketName, ByteBuffer) -> Option<Packet>;

/// Variant constructor registered for a kind, if any
fn constructor(name: PacketName) -> Option<Constructor> {
    let constructor: Constructor = match name {
        PacketName::CommandResponse => |length, name, body| {
            CommandResponsePacket::new(length, name, body).map(Packet::CommandResponse)
        },
        PacketName::StartData => {
            |length, name, body| StartDataPacket::new(length, name, body).map(Packet::StartData)
        }
        PacketName::Data => |length, name, body| DataPacket::new(length, name, body).map(Packet::Data),
        PacketName::EndData => {
            |length, name, body| EndDataPacket::new(length, name, body).map(Packet::EndData)
        }
        PacketName::Event => {
            |length, name, body| EventPacket::new(length, name, body).map(Packet::Event)
        }
        PacketName::InitCommandAck => |length, name, body| {
            InitCommandAckPacket::new(length, name, body).map(Packet::InitCommandAck)
        },
        PacketName::VendorResync => {
            |length, name, body| ResyncPacket::new(length, name, body).map(Packet::Resync)
        }
        _ => return None,
    };
    Some(constructor)
}

impl Packet {
    /// Parse the packet at the start of `buffer`
    ///
    /// `None` means the bytes do not (yet) form a packet: fewer than 8
    /// bytes, an unknown kind tag, or a body the variant rejects. Treat it as
    /// "wait for more bytes", not as a terminal error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptpip_core::{ByteBuffer, Packet, Packetable, PacketName};
    ///
    /// let buffer = ByteBuffer::from_hex("0e 00 00 00 07 00 00 00 01 20 02 00 00 00").unwrap();
    /// let packet = Packet::parse(&buffer).unwrap();
    /// assert_eq!(packet.name(), PacketName::CommandResponse);
    /// assert_eq!(packet.length(), 14);
    /// assert_eq!(packet.transaction_id(), Some(2));
    /// ```
    pub fn parse(buffer: &ByteBuffer) -> Option<Packet> {
        if buffer.len() < HEADER_SIZE {
            return None;
        }

        let length: u32 = buffer.read_at(0)?;
        let tag: u32 = buffer.read_at(4)?;
        let name = match PacketName::try_from(tag) {
            Ok(name) => name,
            Err(e) => {
                trace!("Framing rejected header: {}", e);
                return None;
            }
        };

        // Measured from the start of the header, not from the tag
        let body = buffer.sliced(HEADER_SIZE, Some(length as usize));

        match constructor(name) {
            Some(construct) => construct(length, name, body),
            None => GenericPacket::new(length, name, body).map(Packet::Generic),
        }
    }

    /// Transaction id, for variants that carry one
    pub fn transaction_id(&self) -> Option<u32> {
        match self {
            Self::CommandResponse(p) => p.transaction_id(),
            Self::StartData(p) => p.transaction_id(),
            Self::Data(p) => p.transaction_id(),
            Self::EndData(p) => p.transaction_id(),
            Self::Event(p) => p.transaction_id(),
            Self::Generic(_) | Self::InitCommandAck(_) | Self::Resync(_) => None,
        }
    }

    /// Check if this is a command response still waiting to be merged with
    /// later bytes
    pub fn is_awaiting_further_data(&self) -> bool {
        matches!(self, Self::CommandResponse(p) if p.awaiting_further_data)
    }
}

impl Packetable for Packet {
    fn name(&self) -> PacketName {
        match self {
            Self::Generic(p) => p.name(),
            Self::CommandResponse(p) => p.name(),
            Self::StartData(p) => p.name(),
            Self::Data(p) => p.name(),
            Self::EndData(p) => p.name(),
            Self::Event(p) => p.name(),
            Self::InitCommandAck(p) => p.name(),
            Self::Resync(p) => p.name(),
        }
    }

    fn length(&self) -> u32 {
        match self {
            Self::Generic(p) => p.length(),
            Self::CommandResponse(p) => p.length(),
            Self::StartData(p) => p.length(),
            Self::Data(p) => p.length(),
            Self::EndData(p) => p.length(),
            Self::Event(p) => p.length(),
            Self::InitCommandAck(p) => p.length(),
            Self::Resync(p) => p.length(),
        }
    }

    fn data(&self) -> &ByteBuffer {
        match self {
            Self::Generic(p) => p.data(),
            Self::CommandResponse(p) => p.data(),
            Self::StartData(p) => p.data(),
            Self::Data(p) => p.data(),
            Self::EndData(p) => p.data(),
            Self::Event(p) => p.data(),
            Self::InitCommandAck(p) => p.data(),
            Self::Resync(p) => p.data(),
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet[{}](len={}", self.name(), self.length())?;
        if let Some(id) = self.transaction_id() {
            write!(f, ", txn={}", id)?;
        }
        write!(f, ")")
    }
}

/// Check that the body holds everything the declared length promises
pub(crate) fn body_complete(length: u32, body: &ByteBuffer) -> bool {
    body.len() >= (length as usize).saturating_sub(HEADER_SIZE)
}
