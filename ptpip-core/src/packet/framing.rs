//! Framing packets out of an accumulated byte buffer

use tracing::trace;

use crate::buffer::ByteBuffer;

use super::{Packet, Packetable};

impl ByteBuffer {
    /// Parse the packet starting at `offset`
    ///
    /// Returns the packet and the number of bytes it occupies (its own
    /// length, which may differ from the declared one), or `None` when more
    /// bytes are needed.
    pub fn parse_packet(&self, offset: usize) -> Option<(Packet, u32)> {
        let packet = Packet::parse(&self.sliced(offset, None))?;
        let length = packet.length();
        Some((packet, length))
    }

    /// Parse every complete packet at the front of the buffer, removing the
    /// bytes they occupied
    ///
    /// Stops at the first position that does not yet hold a packet; those
    /// bytes stay in the buffer for the next call.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptpip_core::{ByteBuffer, Packetable, PacketName};
    ///
    /// let mut buffer = ByteBuffer::from_hex(
    ///     "08 00 00 00 0d 00 00 00 0e 00 00 00 07 00 00 00 01 20 01 00",
    /// ).unwrap();
    /// let packets = buffer.parse_packets();
    /// assert_eq!(packets.len(), 1);
    /// assert_eq!(packets[0].name(), PacketName::Ping);
    /// assert_eq!(buffer.len(), 12);
    /// ```
    pub fn parse_packets(&mut self) -> Vec<Packet> {
        let mut packets = Vec::new();
        let mut offset = 0usize;

        while let Some((packet, length)) = self.parse_packet(offset) {
            trace!("Framed {} at offset {}", packet, offset);
            offset += length as usize;

            // An awaiting response already holds the body bytes it saw, and
            // whatever follows belongs to it
            let stop = match &packet {
                Packet::CommandResponse(response) if response.awaiting_further_data => {
                    offset += response.original_data().len();
                    true
                }
                _ => false,
            };
            packets.push(packet);
            if stop || offset >= self.len() {
                break;
            }
        }

        self.slice(offset, None);
        packets
    }
}
