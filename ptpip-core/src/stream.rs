//! Incremental packet accumulator
//!
//! [`PacketStream`] owns the growing buffer for one channel. Feed it bytes as
//! the socket delivers them and drain whole packets out; partial packets stay
//! buffered until the rest arrives. It also drives the malformed command
//! response merge, so callers never see a response that is still waiting for
//! its body.

use tracing::{debug, trace, warn};

use crate::{
    buffer::ByteBuffer,
    constants::DEFAULT_MAX_BUFFERED,
    error::{Error, Result},
    packet::{CommandResponsePacket, Packet},
};

/// Byte accumulator that yields complete packets
///
/// # Examples
///
/// ```
/// use ptpip_core::{PacketStream, Packetable, PacketName};
///
/// let mut stream = PacketStream::new();
/// stream.extend(&[0x08, 0x00, 0x00, 0x00, 0x0d]).unwrap();
/// assert!(stream.next_packets().is_empty());
///
/// stream.extend(&[0x00, 0x00, 0x00]).unwrap();
/// let packets = stream.next_packets();
/// assert_eq!(packets[0].name(), PacketName::Ping);
/// ```
#[derive(Debug)]
pub struct PacketStream {
    buffer: ByteBuffer,
    max_buffered: usize,
    awaiting: Option<CommandResponsePacket>,
}

impl PacketStream {
    /// Create an empty stream with the default buffer limit
    pub fn new() -> Self {
        Self {
            buffer: ByteBuffer::new(),
            max_buffered: DEFAULT_MAX_BUFFERED,
            awaiting: None,
        }
    }

    /// Limit how many bytes may sit in the buffer
    pub fn with_max_buffered(mut self, max_buffered: usize) -> Self {
        self.max_buffered = max_buffered;
        self
    }

    /// Append received bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if the bytes would push the buffer
    /// past its limit. Nothing is appended in that case.
    pub fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        let size = self.buffer.len() + bytes.len();
        if size > self.max_buffered {
            return Err(Error::BufferOverflow {
                size,
                max: self.max_buffered,
            });
        }
        self.buffer.append_bytes(bytes);
        Ok(())
    }

    /// Bytes received but not yet framed
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Check if a malformed command response is waiting for its body
    pub fn is_awaiting(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Drop all buffered bytes and any pending response
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.awaiting = None;
    }

    /// Take every packet the buffered bytes complete, in arrival order
    pub fn next_packets(&mut self) -> Vec<Packet> {
        let mut packets = Vec::new();

        loop {
            if let Some(pending) = self.awaiting.take() {
                match self.resolve(pending) {
                    Ok(packet) => packets.push(packet),
                    Err(pending) => {
                        self.awaiting = Some(pending);
                        return packets;
                    }
                }
            }

            let framed = self.buffer.parse_packets();
            if framed.is_empty() {
                return packets;
            }

            for packet in framed {
                match packet {
                    Packet::CommandResponse(response) if response.awaiting_further_data => {
                        trace!("Holding malformed response until more bytes arrive");
                        self.awaiting = Some(response);
                    }
                    other => packets.push(other),
                }
            }

            if self.awaiting.is_none() {
                return packets;
            }
        }
    }

    /// Try to complete a pending response from the buffer
    ///
    /// Hands the response back when more bytes are needed.
    fn resolve(
        &mut self,
        mut pending: CommandResponsePacket,
    ) -> std::result::Result<Packet, CommandResponsePacket> {
        if let Some((merged, consumed)) = pending.adding_awaited_data(&self.buffer) {
            debug!("Recovered command response after {} awaited bytes", consumed);
            self.buffer.slice(consumed, None);
            return Ok(Packet::CommandResponse(merged));
        }

        if self.buffer.len() < pending.missing_bytes() {
            return Err(pending);
        }

        warn!(
            "Giving up on malformed command response (declared length {})",
            pending.original_length()
        );
        // The declared body is spent either way
        self.buffer.slice(pending.missing_bytes(), None);
        pending.awaiting_further_data = false;
        Ok(Packet::CommandResponse(pending))
    }
}

impl Default for PacketStream {
    fn default() -> Self {
        Self::new()
    }
}
