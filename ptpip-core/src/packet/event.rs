//! Event packet

use crate::{buffer::ByteBuffer, code::EventCode};

use super::{body_complete, PacketName, Packetable, Transactional};

/// Event raised by the device on the event channel
///
/// Body layout: event code (u16), then optionally a transaction id (u32)
/// and up to three parameter words (u32) running to the end of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPacket {
    pub name: PacketName,
    pub length: u32,

    /// Raw body
    pub data: ByteBuffer,

    pub code: EventCode,
    pub transaction_id: Option<u32>,
    pub parameters: Vec<u32>,
}

impl EventPacket {
    pub(crate) fn new(length: u32, name: PacketName, body: ByteBuffer) -> Option<Self> {
        if !body_complete(length, &body) {
            return None;
        }

        let mut offset = 0;
        let code = EventCode::from(body.read::<u16>(&mut offset)?);
        let transaction_id = body.read(&mut offset);

        // A trailing partial word is not a parameter
        let parameters = std::iter::from_fn(|| body.read::<u32>(&mut offset)).collect();

        Some(Self {
            name,
            length,
            data: body,
            code,
            transaction_id,
            parameters,
        })
    }
}

impl Packetable for EventPacket {
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

impl Transactional for EventPacket {
    fn transaction_id(&self) -> Option<u32> {
        self.transaction_id
    }
}
