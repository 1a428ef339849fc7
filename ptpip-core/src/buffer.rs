//! Little-endian byte buffer
//!
//! [`ByteBuffer`] is the primitive every packet and property record is read
//! from and written into. Storage is a sequence of optional bytes: writing
//! past the end pads the gap with unset slots instead of zeros, which lets
//! packet builders fill a header in after the body is known. Unset slots are
//! never readable and are emitted as `0x00` on the wire.
//!
//! Reads return `None` instead of panicking when they run past the end, and
//! slicing clamps both bounds. Declared lengths coming off the wire are not
//! trustworthy, so nothing in here may panic on a bad offset.

use std::fmt;

use bytes::Bytes;
use tracing::warn;

use crate::{
    error::Result,
    value::TypedValue,
};

/// How a string is delimited on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFraming {
    /// A one-byte code unit count (including the terminator) precedes the
    /// characters
    Counted,

    /// Characters run until a zero code unit or the end of the buffer
    NullTerminated,
}

/// Width of a single character code unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharEncoding {
    /// One byte per code unit
    Utf8,

    /// Two bytes per code unit (ISO 10646 / UTF-16LE as used by PIMA 15740)
    Utf16,
}

impl CharEncoding {
    /// Code unit width in bytes
    pub fn width(self) -> usize {
        match self {
            Self::Utf8 => 1,
            Self::Utf16 => 2,
        }
    }
}

/// Longest string a counted length byte can describe, excluding the terminator
const MAX_COUNTED_UNITS: usize = u8::MAX as usize - 1;

/// Growable little-endian byte buffer with sparse storage
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    bytes: Vec<Option<u8>>,
}

impl ByteBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Create an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Parse a buffer from hex text
    ///
    /// Any character that is not a hex digit (spaces, newlines) is ignored,
    /// so captures can be pasted in as they are printed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptpip_core::ByteBuffer;
    ///
    /// let buffer = ByteBuffer::from_hex("0e 00 00 00\n07 00 00 00").unwrap();
    /// assert_eq!(buffer.len(), 8);
    /// ```
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits: String = text.chars().filter(char::is_ascii_hexdigit).collect();
        let bytes = hex::decode(digits)?;
        Ok(Self::from(bytes))
    }

    /// Number of stored slots (set or unset)
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the buffer holds no slots
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte at `index`, or `None` if out of range or unset
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied().flatten()
    }

    /// Remove all bytes
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    // MARK: Typed access

    /// Read a typed value at `*offset`, advancing the offset on success
    pub fn read<T: TypedValue>(&self, offset: &mut usize) -> Option<T> {
        T::read_from(self, offset)
    }

    /// Read a typed value at a fixed position without a cursor
    pub fn read_at<T: TypedValue>(&self, offset: usize) -> Option<T> {
        let mut cursor = offset;
        T::read_from(self, &mut cursor)
    }

    /// Append a typed value
    pub fn append<T: TypedValue>(&mut self, value: T) {
        value.append_to(self);
    }

    /// Write a typed value at `offset`, growing the buffer with unset slots
    /// if needed
    pub fn set<T: TypedValue>(&mut self, value: T, offset: usize) {
        value.write_at(self, offset);
    }

    /// Append raw bytes
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes.iter().copied().map(Some));
    }

    /// Append the slots of another buffer, unset slots included
    pub fn append_buffer(&mut self, other: &ByteBuffer) {
        self.bytes.extend_from_slice(&other.bytes);
    }

    /// Write `raw` at `offset`; a write whose end overflows is dropped
    pub(crate) fn set_bytes(&mut self, offset: usize, raw: &[u8]) {
        let Some(end) = offset.checked_add(raw.len()) else {
            warn!("Dropped {}-byte write at offset {}", raw.len(), offset);
            return;
        };
        if self.bytes.len() < end {
            self.bytes.resize(end, None);
        }
        for (slot, byte) in self.bytes[offset..end].iter_mut().zip(raw) {
            *slot = Some(*byte);
        }
    }

    /// Fill `out` from `offset`; fails if any slot is missing or unset
    pub(crate) fn copy_to(&self, offset: usize, out: &mut [u8]) -> Option<()> {
        let end = offset.checked_add(out.len())?;
        let slots = self.bytes.get(offset..end)?;
        for (byte, slot) in out.iter_mut().zip(slots) {
            *byte = (*slot)?;
        }
        Some(())
    }

    // MARK: Arrays

    /// Read a `u32` element count followed by that many values
    ///
    /// Fails as a whole, leaving the offset untouched, if any element is
    /// missing.
    pub fn read_array<T: TypedValue>(&self, offset: &mut usize) -> Option<Vec<T>> {
        let mut cursor = *offset;
        let count: u32 = self.read(&mut cursor)?;
        let count = count as usize;

        // A corrupt count must not drive a huge allocation
        let remaining = self.len().saturating_sub(cursor) / T::WIDTH;
        if count > remaining {
            return None;
        }

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read::<T>(&mut cursor)?);
        }

        *offset = cursor;
        Some(values)
    }

    /// Append a `u32` element count followed by the values
    pub fn append_array<T: TypedValue>(&mut self, values: &[T]) {
        self.append(values.len() as u32);
        for value in values {
            self.append(*value);
        }
    }

    // MARK: Strings

    fn read_unit(&self, offset: usize, encoding: CharEncoding) -> Option<u16> {
        match encoding {
            CharEncoding::Utf8 => self.read_at::<u8>(offset).map(u16::from),
            CharEncoding::Utf16 => self.read_at::<u16>(offset),
        }
    }

    fn decode_units(units: &[u16], encoding: CharEncoding) -> String {
        match encoding {
            CharEncoding::Utf16 => String::from_utf16_lossy(units),
            CharEncoding::Utf8 => {
                let bytes: Vec<u8> = units.iter().map(|unit| *unit as u8).collect();
                String::from_utf8_lossy(&bytes).into_owned()
            }
        }
    }

    /// Read a string at `*offset`
    ///
    /// Returns `None` only when no character could be read. A counted string
    /// whose count byte is zero is the empty string, not a failure. On
    /// failure the offset is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptpip_core::{ByteBuffer, CharEncoding, StringFraming};
    ///
    /// let mut buffer = ByteBuffer::new();
    /// buffer.append_string("ILCE", StringFraming::Counted, CharEncoding::Utf16);
    ///
    /// let mut offset = 0;
    /// let text = buffer.read_string(&mut offset, StringFraming::Counted, CharEncoding::Utf16);
    /// assert_eq!(text.as_deref(), Some("ILCE"));
    /// assert_eq!(offset, buffer.len());
    /// ```
    pub fn read_string(
        &self,
        offset: &mut usize,
        framing: StringFraming,
        encoding: CharEncoding,
    ) -> Option<String> {
        match framing {
            StringFraming::Counted => self.read_counted_string(offset, encoding),
            StringFraming::NullTerminated => self.read_terminated_string(offset, encoding),
        }
    }

    fn read_counted_string(&self, offset: &mut usize, encoding: CharEncoding) -> Option<String> {
        let width = encoding.width();
        let mut cursor = *offset;
        let count: u8 = self.read(&mut cursor)?;

        if count == 0 {
            *offset = cursor;
            return Some(String::new());
        }

        let mut units = Vec::with_capacity(count as usize);
        // Ran out of bytes before the count or a terminator was reached
        let mut truncated = false;
        for index in 0..count as usize {
            match self.read_unit(cursor + width * index, encoding) {
                None => {
                    truncated = true;
                    break;
                }
                Some(0) => break,
                Some(unit) => units.push(unit),
            }
        }

        if units.is_empty() {
            return None;
        }

        cursor += units.len() * width;
        if !truncated {
            cursor += width;
        }
        *offset = cursor;
        Some(Self::decode_units(&units, encoding))
    }

    fn read_terminated_string(&self, offset: &mut usize, encoding: CharEncoding) -> Option<String> {
        let width = encoding.width();
        let mut cursor = *offset;
        let mut units = Vec::new();

        while let Some(unit) = self.read_unit(cursor, encoding) {
            cursor += width;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }

        if units.is_empty() {
            return None;
        }

        *offset = cursor;
        Some(Self::decode_units(&units, encoding))
    }

    /// Append a string
    ///
    /// Counted strings longer than 254 code units are truncated so the count
    /// byte (which includes the terminator) fits. An empty counted string is
    /// a single zero count byte.
    pub fn append_string(&mut self, text: &str, framing: StringFraming, encoding: CharEncoding) {
        let mut units: Vec<u16> = match encoding {
            CharEncoding::Utf16 => text.encode_utf16().collect(),
            CharEncoding::Utf8 => text.bytes().map(u16::from).collect(),
        };

        if framing == StringFraming::Counted {
            if units.is_empty() {
                self.append(0u8);
                return;
            }
            units.truncate(MAX_COUNTED_UNITS);
            self.append((units.len() + 1) as u8);
        }

        for unit in units.into_iter().chain(std::iter::once(0)) {
            match encoding {
                CharEncoding::Utf8 => self.append(unit as u8),
                CharEncoding::Utf16 => self.append(unit),
            }
        }
    }

    // MARK: Slicing

    /// Copy out `offset..end`, clamping both bounds
    ///
    /// `end` defaults to the end of the buffer. An offset at or past the end
    /// yields an empty buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use ptpip_core::ByteBuffer;
    ///
    /// let buffer = ByteBuffer::from(vec![1, 2, 3, 4]);
    /// assert_eq!(buffer.sliced(2, None).to_vec(), vec![3, 4]);
    /// assert_eq!(buffer.sliced(1, Some(100)).to_vec(), vec![2, 3, 4]);
    /// assert!(buffer.sliced(10, Some(2)).is_empty());
    /// ```
    pub fn sliced(&self, offset: usize, end: Option<usize>) -> ByteBuffer {
        let end = end.unwrap_or(self.bytes.len()).min(self.bytes.len());
        if offset >= end {
            return ByteBuffer::new();
        }
        ByteBuffer {
            bytes: self.bytes[offset..end].to_vec(),
        }
    }

    /// Keep only `offset..end`, clamping both bounds
    pub fn slice(&mut self, offset: usize, end: Option<usize>) {
        let end = end.unwrap_or(self.bytes.len()).min(self.bytes.len());
        if offset >= end {
            self.bytes.clear();
            return;
        }
        self.bytes.truncate(end);
        self.bytes.drain(..offset);
    }

    // MARK: Output

    /// Wire bytes, unset slots written as zero
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.iter().map(|slot| slot.unwrap_or(0)).collect()
    }

    /// Wire bytes as [`Bytes`]
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.to_vec())
    }

    /// Lowercase hex rendering of the wire bytes
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_vec())
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_iter().map(Some).collect(),
        }
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().map(Some).collect(),
        }
    }
}

impl From<Bytes> for ByteBuffer {
    fn from(bytes: Bytes) -> Self {
        Self::from(bytes.as_ref())
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = self.sliced(0, Some(32));
        f.debug_struct("ByteBuffer")
            .field("len", &self.len())
            .field("head", &preview.to_hex())
            .finish()
    }
}
