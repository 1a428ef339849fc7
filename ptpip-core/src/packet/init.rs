//! Init command acknowledgement

use std::fmt;

use crate::{
    buffer::{ByteBuffer, CharEncoding, StringFraming},
    constants::{offsets, GUID_SIZE},
};

use super::{body_complete, PacketName, Packetable};

/// Responder's answer to an init command request
///
/// Body layout: the 16-byte responder GUID, the friendly name as a
/// null-terminated UTF-16 string (the one string in the protocol without a
/// count byte), then an optional protocol version word.
#[derive(Clone, PartialEq, Eq)]
pub struct InitCommandAckPacket {
    pub name: PacketName,
    pub length: u32,
    pub data: ByteBuffer,

    /// Responder GUID
    pub guid: [u8; GUID_SIZE],

    /// Responder friendly name (empty if the device sent none)
    pub device_name: String,

    /// Protocol version word following the name, if present
    pub protocol_version: Option<u32>,
}

impl InitCommandAckPacket {
    pub(crate) fn new(length: u32, name: PacketName, body: ByteBuffer) -> Option<Self> {
        if !body_complete(length, &body) || body.len() < GUID_SIZE {
            return None;
        }

        let mut guid = [0u8; GUID_SIZE];
        for (index, byte) in guid.iter_mut().enumerate() {
            *byte = body.get(index)?;
        }

        let mut offset = offsets::INIT_ACK_NAME;
        let device_name = body
            .read_string(&mut offset, StringFraming::NullTerminated, CharEncoding::Utf16)
            .unwrap_or_default();
        if device_name.is_empty() {
            // An empty name is just its terminator
            offset += CharEncoding::Utf16.width();
        }
        let protocol_version = body.read(&mut offset);

        Some(Self {
            name,
            length,
            data: body,
            guid,
            device_name,
            protocol_version,
        })
    }

    /// Connection number the event channel must present
    ///
    /// Responders put it in the leading word of the identifier block, so it
    /// is read from the first four GUID bytes.
    pub fn connection_number(&self) -> u32 {
        u32::from_le_bytes([self.guid[0], self.guid[1], self.guid[2], self.guid[3]])
    }
}

impl Packetable for InitCommandAckPacket {
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

impl fmt::Debug for InitCommandAckPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitCommandAckPacket")
            .field("length", &self.length)
            .field("guid", &hex::encode(self.guid))
            .field("device_name", &self.device_name)
            .field("protocol_version", &self.protocol_version.map(|v| format!("0x{:08X}", v)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{OutboundPacket, Packet};
    use pretty_assertions::assert_eq;

    fn ack_bytes(guid: &[u8; 16], name: &str, version: Option<u32>) -> ByteBuffer {
        let mut body = ByteBuffer::new();
        body.append_bytes(guid);
        body.append_string(name, StringFraming::NullTerminated, CharEncoding::Utf16);
        if let Some(version) = version {
            body.append(version);
        }

        let mut packet = ByteBuffer::new();
        packet.append((body.len() + 8) as u32);
        packet.append(u32::from(PacketName::InitCommandAck));
        packet.append_buffer(&body);
        packet
    }

    fn parse_ack(buffer: &ByteBuffer) -> Option<InitCommandAckPacket> {
        match Packet::parse(buffer) {
            Some(Packet::InitCommandAck(ack)) => Some(ack),
            _ => None,
        }
    }

    #[test]
    fn test_ack_with_name_and_version() {
        let guid = [0x11; 16];
        let ack = parse_ack(&ack_bytes(&guid, "ILCE-7M3", Some(0x0001_0000))).unwrap();
        assert_eq!(ack.guid, guid);
        assert_eq!(ack.device_name, "ILCE-7M3");
        assert_eq!(ack.protocol_version, Some(0x0001_0000));
    }

    #[test]
    fn test_connection_number_is_leading_guid_word() {
        let mut guid = [0x42; 16];
        guid[..4].copy_from_slice(&[0x05, 0x01, 0x00, 0x00]);
        let ack = parse_ack(&ack_bytes(&guid, "ILCE-7M3", None)).unwrap();
        assert_eq!(ack.connection_number(), 0x105);
        assert_eq!(ack.guid, guid);
    }

    #[test]
    fn test_ack_without_version() {
        let guid = [0x22; 16];
        let ack = parse_ack(&ack_bytes(&guid, "A7", None)).unwrap();
        assert_eq!(ack.device_name, "A7");
        assert_eq!(ack.protocol_version, None);
    }

    #[test]
    fn test_ack_empty_name() {
        let guid = [0x33; 16];
        let ack = parse_ack(&ack_bytes(&guid, "", Some(1))).unwrap();
        assert_eq!(ack.device_name, "");
        assert_eq!(ack.protocol_version, Some(1));
    }

    #[test]
    fn test_ack_short_guid_fails() {
        let buffer = ByteBuffer::from_hex("10 00 00 00 02 00 00 00 01 02 03 04 05 06 07 08").unwrap();
        assert!(parse_ack(&buffer).is_none());
    }

    #[test]
    fn test_ack_incomplete_fails() {
        let mut buffer = ack_bytes(&[0x44; 16], "Camera", Some(1));
        buffer.slice(0, Some(buffer.len() - 3));
        assert!(parse_ack(&buffer).is_none());
    }

    #[test]
    fn test_ack_is_not_confused_with_request() {
        let request = OutboundPacket::init_command_request(&[0x55; 16], "Remote");
        assert!(parse_ack(request.as_buffer()).is_none());
    }
}
