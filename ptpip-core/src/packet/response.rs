//! Command response packet, including the malformed-response merge

use std::fmt;

use tracing::{debug, trace};

use crate::{
    buffer::ByteBuffer,
    code::ResponseCode,
    constants::{offsets, HEADER_SIZE},
};

use super::{body_complete, Packet, PacketName, Packetable, Transactional};

/// Shortest well-formed command response: header, code and transaction id
const MIN_RESPONSE_LENGTH: u32 = 14;

/// Command response
///
/// Some devices (Sony bodies in particular) send a response whose header
/// arrives before its body, or whose body does not start with a response
/// code. Such a packet is accepted with `code == None`, a length of 8 and,
/// when the header promised more than that, `awaiting_further_data` set.
/// Feed later bytes to [`CommandResponsePacket::adding_awaited_data`] to
/// recover the real response.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandResponsePacket {
    pub name: PacketName,
    pub length: u32,

    /// Response parameters following the transaction id
    pub data: ByteBuffer,

    /// Response code, `None` when the body did not start with a known one
    pub code: Option<ResponseCode>,

    pub transaction_id: Option<u32>,

    /// Set on a malformed response whose header promised more bytes
    pub awaiting_further_data: bool,

    original_length: u32,
    original_data: ByteBuffer,
}

impl CommandResponsePacket {
    pub(crate) fn new(length: u32, name: PacketName, body: ByteBuffer) -> Option<Self> {
        let code = body
            .read_at::<u16>(0)
            .map(ResponseCode::from)
            .filter(|code| code.is_known());

        let Some(code) = code else {
            debug!(
                "Malformed command response (declared length {}, {} body bytes)",
                length,
                body.len()
            );
            return Some(Self {
                name,
                length: HEADER_SIZE as u32,
                data: ByteBuffer::new(),
                code: None,
                transaction_id: None,
                awaiting_further_data: length > HEADER_SIZE as u32,
                original_length: length,
                original_data: body,
            });
        };

        if !body_complete(length, &body) {
            return None;
        }

        let transaction_id = body.read_at(offsets::RESPONSE_TRANSACTION_ID);
        let data = body.sliced(
            offsets::RESPONSE_PARAMETERS,
            Some((length as usize).saturating_sub(HEADER_SIZE)),
        );

        Some(Self {
            name,
            length,
            data,
            code: Some(code),
            transaction_id,
            awaiting_further_data: false,
            original_length: length,
            original_data: ByteBuffer::new(),
        })
    }

    /// Check if the response carries [`ResponseCode::Ok`]
    pub fn is_ok(&self) -> bool {
        self.code == Some(ResponseCode::Ok)
    }

    /// Response parameters as 32-bit words
    pub fn parameters(&self) -> Vec<u32> {
        let mut offset = 0;
        std::iter::from_fn(|| self.data.read::<u32>(&mut offset)).collect()
    }

    /// Declared length of the header this packet was parsed from
    pub fn original_length(&self) -> u32 {
        self.original_length
    }

    /// Body bytes held back by a malformed response
    pub fn original_data(&self) -> &ByteBuffer {
        &self.original_data
    }

    /// Bytes still missing before a merge can succeed
    pub fn missing_bytes(&self) -> usize {
        (self.original_length.max(MIN_RESPONSE_LENGTH) as usize)
            .saturating_sub(HEADER_SIZE)
            .saturating_sub(self.original_data.len())
    }

    /// Merge bytes that arrived after a malformed response
    ///
    /// Rebuilds the header (declared length, but at least 14), appends the
    /// held-back body and `data`, and re-parses the concatenation. Succeeds
    /// only when the result is a complete, well-formed response. The second
    /// element is the number of bytes taken from the front of `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptpip_core::{ByteBuffer, Packet};
    ///
    /// // Header promising 14 bytes, body still in flight
    /// let header = ByteBuffer::from_hex("0e 00 00 00 07 00 00 00").unwrap();
    /// let Some(Packet::CommandResponse(pending)) = Packet::parse(&header) else {
    ///     panic!("expected a command response");
    /// };
    /// assert!(pending.awaiting_further_data);
    ///
    /// let rest = ByteBuffer::from_hex("01 20 05 00 00 00").unwrap();
    /// let (response, consumed) = pending.adding_awaited_data(&rest).unwrap();
    /// assert!(response.is_ok());
    /// assert_eq!(response.transaction_id, Some(5));
    /// assert_eq!(consumed, 6);
    /// ```
    pub fn adding_awaited_data(&self, data: &ByteBuffer) -> Option<(CommandResponsePacket, usize)> {
        let mut full = ByteBuffer::with_capacity(HEADER_SIZE + self.original_data.len() + data.len());
        full.append(self.original_length.max(MIN_RESPONSE_LENGTH));
        full.append(u32::from(PacketName::CommandResponse));
        full.append_buffer(&self.original_data);
        full.append_buffer(data);

        let Some(Packet::CommandResponse(merged)) = Packet::parse(&full) else {
            trace!("Merge of {} awaited bytes did not yield a response", data.len());
            return None;
        };
        if merged.awaiting_further_data || merged.code.is_none() {
            return None;
        }

        let consumed = (merged.length as usize)
            .saturating_sub(HEADER_SIZE)
            .saturating_sub(self.original_data.len())
            .min(data.len());
        debug!(
            "Merged malformed response into {:?} (consumed {} bytes)",
            merged.code, consumed
        );
        Some((merged, consumed))
    }
}

impl Packetable for CommandResponsePacket {
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

impl Transactional for CommandResponsePacket {
    fn transaction_id(&self) -> Option<u32> {
        self.transaction_id
    }
}

impl fmt::Debug for CommandResponsePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResponsePacket")
            .field("length", &self.length)
            .field("code", &self.code)
            .field("transaction_id", &self.transaction_id)
            .field("awaiting_further_data", &self.awaiting_further_data)
            .field("data", &self.data.to_hex())
            .finish()
    }
}
