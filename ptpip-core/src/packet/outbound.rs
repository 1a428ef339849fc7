//! Ready-to-send packets
//!
//! Every constructor writes the kind tag first, appends the body, then fills
//! the length in at offset 0 once the body size is known.

use std::fmt;

use bytes::Bytes;

use crate::{
    buffer::{ByteBuffer, CharEncoding, StringFraming},
    constants::{GUID_SIZE, HEADER_SIZE, MAX_FRIENDLY_NAME, MAX_PACKET_LENGTH, PROTOCOL_VERSION, SMALL_PAYLOAD_THRESHOLD},
    error::{Error, Result},
};

use super::PacketName;

/// An encoded packet with a correct header
#[derive(Clone, PartialEq, Eq)]
pub struct OutboundPacket {
    name: PacketName,
    buffer: ByteBuffer,
}

impl OutboundPacket {
    fn build(name: PacketName, body: impl FnOnce(&mut ByteBuffer)) -> Self {
        let mut buffer = ByteBuffer::with_capacity(HEADER_SIZE);
        buffer.set(u32::from(name), 4);
        body(&mut buffer);
        let length = buffer.len() as u32;
        buffer.set(length, 0);
        Self { name, buffer }
    }

    fn check_payload(payload: &[u8]) -> Result<()> {
        // Transaction id plus header ride along with every payload
        let max = MAX_PACKET_LENGTH - HEADER_SIZE - 4;
        if payload.len() > max {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max,
            });
        }
        Ok(())
    }

    /// Init command request opening the command channel
    ///
    /// `guid` is zero-padded or truncated to 16 bytes and `friendly_name` is
    /// cut to 80 UTF-16 code units.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptpip_core::{OutboundPacket, PacketName};
    ///
    /// let packet = OutboundPacket::init_command_request(&[0xAB; 16], "Remote");
    /// assert_eq!(packet.name(), PacketName::InitCommandRequest);
    /// // header + guid + "Remote\0" in UTF-16 + version
    /// assert_eq!(packet.len(), 8 + 16 + 14 + 4);
    /// ```
    pub fn init_command_request(guid: &[u8], friendly_name: &str) -> Self {
        Self::build(PacketName::InitCommandRequest, |buffer| {
            let mut padded = [0u8; GUID_SIZE];
            let count = guid.len().min(GUID_SIZE);
            padded[..count].copy_from_slice(&guid[..count]);
            buffer.append_bytes(&padded);

            let units: Vec<u16> = friendly_name.encode_utf16().take(MAX_FRIENDLY_NAME).collect();
            let name = String::from_utf16_lossy(&units);
            buffer.append_string(&name, StringFraming::NullTerminated, CharEncoding::Utf16);

            buffer.append(PROTOCOL_VERSION);
        })
    }

    /// Init event request binding the event channel to a connection number
    pub fn init_event_request(connection_number: u32) -> Self {
        Self::build(PacketName::InitEventRequest, |buffer| {
            buffer.append(connection_number);
        })
    }

    /// Start of an initiator-to-device data phase
    pub fn start_data(transaction_id: u32, total_length: u64) -> Self {
        Self::build(PacketName::StartData, |buffer| {
            buffer.append(transaction_id);
            buffer.append(total_length);
        })
    }

    /// Continuation chunk of a data phase
    pub fn data(transaction_id: u32, payload: &[u8]) -> Result<Self> {
        Self::check_payload(payload)?;
        Ok(Self::build(PacketName::Data, |buffer| {
            buffer.append(transaction_id);
            buffer.append_bytes(payload);
        }))
    }

    /// Final chunk of a data phase
    pub fn end_data(transaction_id: u32, payload: &[u8]) -> Result<Self> {
        Self::check_payload(payload)?;
        Ok(Self::build(PacketName::EndData, |buffer| {
            buffer.append(transaction_id);
            buffer.append_bytes(payload);
        }))
    }

    /// Split an outgoing payload into start, (data) and end packets
    ///
    /// Payloads under 128 bytes ride in the end-data packet; larger ones get
    /// a data packet followed by an empty end-data packet.
    pub fn data_phase(transaction_id: u32, payload: &[u8]) -> Result<Vec<Self>> {
        let start = Self::start_data(transaction_id, payload.len() as u64);
        if payload.len() < SMALL_PAYLOAD_THRESHOLD {
            return Ok(vec![start, Self::end_data(transaction_id, payload)?]);
        }
        Ok(vec![
            start,
            Self::data(transaction_id, payload)?,
            Self::end_data(transaction_id, &[])?,
        ])
    }

    /// Cancel a transaction in flight
    pub fn cancel_transaction(transaction_id: u32) -> Self {
        Self::build(PacketName::CancelTransaction, |buffer| {
            buffer.append(transaction_id);
        })
    }

    /// Keep-alive probe
    pub fn ping() -> Self {
        Self::build(PacketName::Ping, |_| {})
    }

    /// Answer to a ping
    pub fn pong() -> Self {
        Self::build(PacketName::Pong, |_| {})
    }

    pub(crate) fn from_body(name: PacketName, body: impl FnOnce(&mut ByteBuffer)) -> Self {
        Self::build(name, body)
    }

    /// Packet kind
    pub fn name(&self) -> PacketName {
        self.name
    }

    /// Encoded length, header included
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false: every packet has at least a header
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Encoded packet
    pub fn as_buffer(&self) -> &ByteBuffer {
        &self.buffer
    }

    /// Wire bytes
    pub fn to_bytes(&self) -> Bytes {
        self.buffer.to_bytes()
    }
}

impl fmt::Debug for OutboundPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundPacket")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_written_last() {
        let packet = OutboundPacket::init_event_request(1);
        assert_eq!(
            packet.to_bytes().as_ref(),
            &[0x0C, 0, 0, 0, 0x03, 0, 0, 0, 0x01, 0, 0, 0][..]
        );
    }

    #[test]
    fn test_init_command_request_layout() {
        let packet = OutboundPacket::init_command_request(&[1, 2, 3], "Ab");
        let bytes = packet.to_bytes();

        assert_eq!(packet.len(), 8 + 16 + 6 + 4);
        assert_eq!(&bytes[8..11], &[1, 2, 3]);
        assert_eq!(&bytes[11..24], &[0; 13]);
        assert_eq!(&bytes[24..30], &[0x41, 0, 0x62, 0, 0, 0]);
        assert_eq!(&bytes[30..34], &[0, 0, 1, 0]);
    }

    #[test]
    fn test_init_command_request_truncates() {
        let long_guid = [7u8; 20];
        let long_name = "n".repeat(100);
        let packet = OutboundPacket::init_command_request(&long_guid, &long_name);
        assert_eq!(packet.len(), 8 + 16 + (80 + 1) * 2 + 4);
    }

    #[test]
    fn test_start_data_length_is_64_bit() {
        let packet = OutboundPacket::start_data(9, 0x1_0000_0000);
        let buffer = packet.as_buffer();
        assert_eq!(packet.len(), 20);
        assert_eq!(buffer.read_at::<u32>(8), Some(9));
        assert_eq!(buffer.read_at::<u64>(12), Some(0x1_0000_0000));
    }

    #[test]
    fn test_small_payload_rides_in_end_data() {
        let packets = OutboundPacket::data_phase(4, &[0xEE; 127]).unwrap();
        let names: Vec<_> = packets.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec![PacketName::StartData, PacketName::EndData]);
        assert_eq!(packets[1].len(), 12 + 127);
    }

    #[test]
    fn test_large_payload_gets_data_packet() {
        let packets = OutboundPacket::data_phase(4, &[0xEE; 128]).unwrap();
        let names: Vec<_> = packets.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![PacketName::StartData, PacketName::Data, PacketName::EndData]
        );
        assert_eq!(packets[1].len(), 12 + 128);
        assert_eq!(packets[2].len(), 12);
        assert_eq!(packets[0].as_buffer().read_at::<u64>(12), Some(128));
    }

    #[test]
    fn test_cancel_ping_pong() {
        let cancel = OutboundPacket::cancel_transaction(0x10);
        assert_eq!(cancel.to_bytes().as_ref(), &[12, 0, 0, 0, 11, 0, 0, 0, 0x10, 0, 0, 0][..]);
        assert_eq!(OutboundPacket::ping().to_bytes().as_ref(), &[8, 0, 0, 0, 13, 0, 0, 0][..]);
        assert_eq!(OutboundPacket::pong().to_bytes().as_ref(), &[8, 0, 0, 0, 14, 0, 0, 0][..]);
    }
}
