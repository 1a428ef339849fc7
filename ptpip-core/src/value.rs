//! Typed value codec
//!
//! Every fixed-width integer the protocol carries (8 to 64 bits, signed or
//! unsigned) reads and writes itself little-endian through [`TypedValue`].
//! Signed values are reconstructed as two's complement of the raw bit
//! pattern at their own width, so `FF FF` reads back as `-1i16` rather than
//! failing or widening.

use std::fmt;
use std::mem::size_of;

use byteorder::{ByteOrder, LittleEndian};

use crate::buffer::ByteBuffer;

/// A primitive that can be encoded to and decoded from a [`ByteBuffer`]
///
/// # Examples
///
/// ```
/// use ptpip_core::{ByteBuffer, TypedValue};
///
/// let mut buffer = ByteBuffer::new();
/// buffer.append(-2i16);
///
/// let mut offset = 0;
/// assert_eq!(i16::read_from(&buffer, &mut offset), Some(-2));
/// assert_eq!(offset, i16::WIDTH);
/// ```
pub trait TypedValue: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Write the value at `offset`, padding the buffer with unset slots if
    /// `offset` lies beyond its current end
    fn write_at(self, buffer: &mut ByteBuffer, offset: usize);

    /// Read a value at `*offset`, advancing the offset by [`Self::WIDTH`]
    ///
    /// Returns `None` without touching the offset when any byte of the value
    /// is missing or unset.
    fn read_from(buffer: &ByteBuffer, offset: &mut usize) -> Option<Self>;

    /// Append the value to the end of the buffer
    fn append_to(self, buffer: &mut ByteBuffer) {
        let end = buffer.len();
        self.write_at(buffer, end);
    }
}

macro_rules! byte_value {
    ($($ty:ty),*) => {$(
        impl TypedValue for $ty {
            const WIDTH: usize = 1;

            fn write_at(self, buffer: &mut ByteBuffer, offset: usize) {
                buffer.set_bytes(offset, &self.to_le_bytes());
            }

            fn read_from(buffer: &ByteBuffer, offset: &mut usize) -> Option<Self> {
                let mut raw = [0u8; 1];
                buffer.copy_to(*offset, &mut raw)?;
                *offset += Self::WIDTH;
                Some(<$ty>::from_le_bytes(raw))
            }
        }
    )*};
}

macro_rules! word_value {
    ($($ty:ty => $read:ident, $write:ident;)*) => {$(
        impl TypedValue for $ty {
            const WIDTH: usize = size_of::<$ty>();

            fn write_at(self, buffer: &mut ByteBuffer, offset: usize) {
                let mut raw = [0u8; size_of::<$ty>()];
                LittleEndian::$write(&mut raw, self);
                buffer.set_bytes(offset, &raw);
            }

            fn read_from(buffer: &ByteBuffer, offset: &mut usize) -> Option<Self> {
                let mut raw = [0u8; size_of::<$ty>()];
                buffer.copy_to(*offset, &mut raw)?;
                *offset += Self::WIDTH;
                Some(LittleEndian::$read(&raw))
            }
        }
    )*};
}

byte_value!(u8, i8);

word_value! {
    u16 => read_u16, write_u16;
    u32 => read_u32, write_u32;
    u64 => read_u64, write_u64;
    i16 => read_i16, write_i16;
    i32 => read_i32, write_i32;
    i64 => read_i64, write_i64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn round_trip<T: TypedValue>(value: T) -> (Option<T>, usize) {
        let mut buffer = ByteBuffer::new();
        buffer.append(value);
        let mut offset = 0;
        let decoded = T::read_from(&buffer, &mut offset);
        (decoded, offset)
    }

    #[test]
    fn test_widths() {
        assert_eq!(u8::WIDTH, 1);
        assert_eq!(i8::WIDTH, 1);
        assert_eq!(u16::WIDTH, 2);
        assert_eq!(i16::WIDTH, 2);
        assert_eq!(u32::WIDTH, 4);
        assert_eq!(i32::WIDTH, 4);
        assert_eq!(u64::WIDTH, 8);
        assert_eq!(i64::WIDTH, 8);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buffer = ByteBuffer::new();
        buffer.append(0x1234_5678u32);
        assert_eq!(buffer.to_vec(), vec![0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_signed_boundaries() {
        assert_eq!(round_trip(i8::MIN), (Some(i8::MIN), 1));
        assert_eq!(round_trip(i8::MAX), (Some(i8::MAX), 1));
        assert_eq!(round_trip(i16::MIN), (Some(i16::MIN), 2));
        assert_eq!(round_trip(i16::MAX), (Some(i16::MAX), 2));
        assert_eq!(round_trip(i32::MIN), (Some(i32::MIN), 4));
        assert_eq!(round_trip(i32::MAX), (Some(i32::MAX), 4));
        assert_eq!(round_trip(i64::MIN), (Some(i64::MIN), 8));
        assert_eq!(round_trip(i64::MAX), (Some(i64::MAX), 8));
    }

    #[test]
    fn test_signed_from_high_bit_pattern() {
        let buffer = ByteBuffer::from(vec![0xFF, 0xFF]);
        let mut offset = 0;
        assert_eq!(i16::read_from(&buffer, &mut offset), Some(-1));

        let buffer = ByteBuffer::from(vec![0x00, 0x80]);
        let mut offset = 0;
        assert_eq!(i16::read_from(&buffer, &mut offset), Some(i16::MIN));

        let buffer = ByteBuffer::from(vec![0x80]);
        let mut offset = 0;
        assert_eq!(i8::read_from(&buffer, &mut offset), Some(-128));

        let buffer = ByteBuffer::from(vec![0xFF; 8]);
        let mut offset = 0;
        assert_eq!(i64::read_from(&buffer, &mut offset), Some(-1));
    }

    #[test]
    fn test_unsigned_boundaries() {
        assert_eq!(round_trip(u8::MAX), (Some(u8::MAX), 1));
        assert_eq!(round_trip(u16::MAX), (Some(u16::MAX), 2));
        assert_eq!(round_trip(u32::MAX), (Some(u32::MAX), 4));
        assert_eq!(round_trip(u64::MAX), (Some(u64::MAX), 8));
    }

    #[test]
    fn test_short_read_leaves_offset() {
        let buffer = ByteBuffer::from(vec![0x01, 0x02, 0x03]);
        let mut offset = 0;
        assert_eq!(u32::read_from(&buffer, &mut offset), None);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_unset_slot_fails_read() {
        let mut buffer = ByteBuffer::new();
        buffer.set(0xABu8, 3);
        let mut offset = 0;
        assert_eq!(u32::read_from(&buffer, &mut offset), None);
        assert_eq!(offset, 0);

        let mut offset = 3;
        assert_eq!(u8::read_from(&buffer, &mut offset), Some(0xAB));
    }

    proptest! {
        #[test]
        fn prop_u16_round_trip(value: u16) {
            prop_assert_eq!(round_trip(value), (Some(value), 2));
        }

        #[test]
        fn prop_u32_round_trip(value: u32) {
            prop_assert_eq!(round_trip(value), (Some(value), 4));
        }

        #[test]
        fn prop_u64_round_trip(value: u64) {
            prop_assert_eq!(round_trip(value), (Some(value), 8));
        }

        #[test]
        fn prop_i8_round_trip(value: i8) {
            prop_assert_eq!(round_trip(value), (Some(value), 1));
        }

        #[test]
        fn prop_i16_round_trip(value: i16) {
            prop_assert_eq!(round_trip(value), (Some(value), 2));
        }

        #[test]
        fn prop_i32_round_trip(value: i32) {
            prop_assert_eq!(round_trip(value), (Some(value), 4));
        }

        #[test]
        fn prop_i64_round_trip(value: i64) {
            prop_assert_eq!(round_trip(value), (Some(value), 8));
        }

        #[test]
        fn prop_read_at_offset(prefix in proptest::collection::vec(any::<u8>(), 0..16), value: u32) {
            let mut buffer = ByteBuffer::from(prefix.clone());
            buffer.append(value);
            let mut offset = prefix.len();
            prop_assert_eq!(u32::read_from(&buffer, &mut offset), Some(value));
            prop_assert_eq!(offset, prefix.len() + 4);
        }
    }
}
