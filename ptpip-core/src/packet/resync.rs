//! Vendor resync packet
//!
//! Some Sony bodies send packets of kind `0xFFFF` whose declared length runs
//! into the packet after them. Retrying the parse would never help, so this
//! variant looks for the next packet boundary itself and ends there.

use tracing::debug;

use crate::{buffer::ByteBuffer, constants::HEADER_SIZE};

use super::{body_complete, PacketName, Packetable};

/// Packet whose length is recovered by scanning for the next header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResyncPacket {
    pub name: PacketName,

    /// Recovered length (header included)
    pub length: u32,

    /// Body up to the recovered boundary
    pub data: ByteBuffer,

    /// Length the header declared
    pub declared_length: u32,
}

impl ResyncPacket {
    pub(crate) fn new(length: u32, name: PacketName, body: ByteBuffer) -> Option<Self> {
        if length as usize <= HEADER_SIZE {
            return Some(Self {
                name,
                length: HEADER_SIZE as u32,
                data: ByteBuffer::new(),
                declared_length: length,
            });
        }

        // A candidate whose length fits in what follows is preferred over one
        // that only looks like a length
        let boundary = find_boundary(&body, true).or_else(|| find_boundary(&body, false));

        if let Some(end) = boundary {
            let recovered = (end + HEADER_SIZE) as u32;
            debug!(
                "Resync packet truncated from {} to {} bytes",
                length, recovered
            );
            return Some(Self {
                name,
                length: recovered,
                data: body.sliced(0, Some(end)),
                declared_length: length,
            });
        }

        if !body_complete(length, &body) {
            return None;
        }

        Some(Self {
            name,
            length,
            data: body,
            declared_length: length,
        })
    }

    /// Check if the declared length was cut short
    pub fn was_truncated(&self) -> bool {
        self.length < self.declared_length
    }
}

/// Body offset where the next packet header starts
///
/// A header is a valid kind tag preceded by a length of at least 8. With
/// `fits` set, the length must also fit in the bytes from the candidate to
/// the end of the body.
fn find_boundary(body: &ByteBuffer, fits: bool) -> Option<usize> {
    // The tag sits 4 bytes into a header
    (4..body.len()).find_map(|offset| {
        let tag: u32 = body.read_at(offset)?;
        let name = PacketName::try_from(tag).ok()?;
        if !name.is_valid() {
            return None;
        }

        let start = offset - 4;
        let candidate: u32 = body.read_at(start)?;
        let available = body.len() - start;
        let plausible = candidate as usize >= HEADER_SIZE
            && (!fits || candidate as usize <= available);
        plausible.then_some(start)
    })
}

impl Packetable for ResyncPacket {
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
