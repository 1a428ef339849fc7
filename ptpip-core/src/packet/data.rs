//! Data phase packets: start, continuation and end
//!
//! A device-to-initiator data phase is one start-data packet announcing the
//! total size, zero or more data packets and a final end-data packet, all
//! carrying the command's transaction id. The payload length of each packet
//! comes from its declared length, never from how many bytes happen to be
//! buffered.

use crate::{
    buffer::ByteBuffer,
    constants::{offsets, HEADER_SIZE},
};

use super::{body_complete, PacketName, Packetable, Transactional};

/// Announces a data phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartDataPacket {
    pub name: PacketName,
    pub length: u32,
    pub data: ByteBuffer,
    pub transaction_id: u32,

    /// Total payload size of the data phase
    pub total_length: u64,
}

impl StartDataPacket {
    pub(crate) fn new(length: u32, name: PacketName, body: ByteBuffer) -> Option<Self> {
        if !body_complete(length, &body) {
            return None;
        }

        let mut offset = 0;
        let transaction_id = body.read(&mut offset)?;
        let total_length = body.read(&mut offset)?;
        Some(Self {
            name,
            length,
            data: body.sliced(offset, Some(payload_end(length))),
            transaction_id,
            total_length,
        })
    }
}

/// Continuation chunk of a data phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPacket {
    pub name: PacketName,
    pub length: u32,

    /// Payload chunk
    pub data: ByteBuffer,
    pub transaction_id: u32,
}

impl DataPacket {
    pub(crate) fn new(length: u32, name: PacketName, body: ByteBuffer) -> Option<Self> {
        let (transaction_id, data) = split_payload(length, &body)?;
        Some(Self {
            name,
            length,
            data,
            transaction_id,
        })
    }
}

/// Final chunk of a data phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndDataPacket {
    pub name: PacketName,
    pub length: u32,

    /// Payload chunk (often empty)
    pub data: ByteBuffer,
    pub transaction_id: u32,
}

impl EndDataPacket {
    pub(crate) fn new(length: u32, name: PacketName, body: ByteBuffer) -> Option<Self> {
        let (transaction_id, data) = split_payload(length, &body)?;
        Some(Self {
            name,
            length,
            data,
            transaction_id,
        })
    }
}

fn payload_end(length: u32) -> usize {
    (length as usize).saturating_sub(HEADER_SIZE)
}

fn split_payload(length: u32, body: &ByteBuffer) -> Option<(u32, ByteBuffer)> {
    if !body_complete(length, body) {
        return None;
    }
    let transaction_id = body.read_at(0)?;
    let data = body.sliced(offsets::DATA_PAYLOAD, Some(payload_end(length)));
    Some((transaction_id, data))
}

macro_rules! impl_data_packet {
    ($($ty:ty),*) => {$(
        impl Packetable for $ty {
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

        impl Transactional for $ty {
            fn transaction_id(&self) -> Option<u32> {
                Some(self.transaction_id)
            }
        }
    )*};
}

impl_data_packet!(StartDataPacket, DataPacket, EndDataPacket);
