//! Device property descriptors
//!
//! A descriptor is a shared header followed by a form specific tail:
//!
//! ```text
//! code (u16) | type (u16) | get/set (u8) | availability (u8)
//! factory (T) | current (T) | form (u8) | tail
//!
//! form 0x00  other        no tail
//! form 0x01  range        min (T) | max (T) | step (T)
//! form 0x02  enumeration  count (u32) | available (T…) | count (u32) | supported (T…)
//! ```
//!
//! Decoding is generic over the primitive `T`, chosen by the caller from
//! what it knows about the property code. A descriptor whose type tag does
//! not match `T` is rejected rather than truncated. [`AnyDeviceProperty`]
//! picks `T` from the tag instead, for bulk listings.

use std::fmt;

use ptpip_core::{ByteBuffer, CharEncoding, PropertyCode, StringFraming, TypedValue};
use tracing::trace;

use crate::error::{Error, Result};

/// Primitive type tag of a property value
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DataType {
    Int8 = 0x0001,
    UInt8 = 0x0002,
    Int16 = 0x0003,
    UInt16 = 0x0004,
    Int32 = 0x0005,
    UInt32 = 0x0006,
    Int64 = 0x0007,
    UInt64 = 0x0008,

    /// Counted UTF-16 string
    String = 0xFFFF,
}

impl TryFrom<u16> for DataType {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        let data_type = match value {
            0x0001 => Self::Int8,
            0x0002 => Self::UInt8,
            0x0003 => Self::Int16,
            0x0004 => Self::UInt16,
            0x0005 => Self::Int32,
            0x0006 => Self::UInt32,
            0x0007 => Self::Int64,
            0x0008 => Self::UInt64,
            0xFFFF => Self::String,
            other => return Err(Error::UnknownDataType(other)),
        };
        Ok(data_type)
    }
}

impl From<DataType> for u16 {
    fn from(data_type: DataType) -> u16 {
        data_type as u16
    }
}

/// A primitive that can be the value type of a property descriptor
pub trait PropertyValue: TypedValue {
    /// Tag identifying this type on the wire
    const DATA_TYPE: DataType;
}

macro_rules! property_value {
    ($($ty:ty => $tag:ident),* $(,)?) => {$(
        impl PropertyValue for $ty {
            const DATA_TYPE: DataType = DataType::$tag;
        }
    )*};
}

property_value! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
}

/// Whether the property can be written at all
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GetSet {
    Get,
    GetSet,
    Unrecognized(u8),
}

impl From<u8> for GetSet {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Get,
            0x01 => Self::GetSet,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<GetSet> for u8 {
    fn from(value: GetSet) -> u8 {
        match value {
            GetSet::Get => 0x00,
            GetSet::GetSet => 0x01,
            GetSet::Unrecognized(raw) => raw,
        }
    }
}

/// Whether the property can be accessed in the camera's current state
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Availability {
    Unavailable,
    GetSet,
    Get,
    Unrecognized(u8),
}

impl From<u8> for Availability {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Unavailable,
            0x01 => Self::GetSet,
            0x02 => Self::Get,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<Availability> for u8 {
    fn from(value: Availability) -> u8 {
        match value {
            Availability::Unavailable => 0x00,
            Availability::GetSet => 0x01,
            Availability::Get => 0x02,
            Availability::Unrecognized(raw) => raw,
        }
    }
}

/// Form flag selecting the descriptor tail
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Form {
    Other = 0x00,
    Range = 0x01,
    Enumeration = 0x02,
}

impl TryFrom<u8> for Form {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Self::Other),
            0x01 => Ok(Self::Range),
            0x02 => Ok(Self::Enumeration),
            other => Err(Error::UnknownForm(other)),
        }
    }
}

/// Fields shared by every descriptor form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyHeader<T> {
    pub code: PropertyCode,
    pub get_set: GetSet,
    pub availability: Availability,
    pub factory: T,
    pub current: T,
}

impl<T: PropertyValue> PropertyHeader<T> {
    /// Parse the header and form flag, advancing `offset` only on success
    fn decode(buffer: &ByteBuffer, offset: &mut usize) -> Option<(Self, Form)> {
        let mut cursor = *offset;
        let code = PropertyCode::from(buffer.read::<u16>(&mut cursor)?);

        let tag: u16 = buffer.read(&mut cursor)?;
        if tag != u16::from(T::DATA_TYPE) {
            trace!(
                "Property {} has type 0x{:04X}, expected {:?}",
                code,
                tag,
                T::DATA_TYPE
            );
            return None;
        }

        let get_set = GetSet::from(buffer.read::<u8>(&mut cursor)?);
        let availability = Availability::from(buffer.read::<u8>(&mut cursor)?);
        let factory = buffer.read(&mut cursor)?;
        let current = buffer.read(&mut cursor)?;
        let form = Form::try_from(buffer.read::<u8>(&mut cursor)?).ok()?;

        *offset = cursor;
        Some((
            Self {
                code,
                get_set,
                availability,
                factory,
                current,
            },
            form,
        ))
    }

    fn encode(&self, buffer: &mut ByteBuffer, form: Form) {
        buffer.append(u16::from(self.code));
        buffer.append(u16::from(T::DATA_TYPE));
        buffer.append(u8::from(self.get_set));
        buffer.append(u8::from(self.availability));
        buffer.append(self.factory);
        buffer.append(self.current);
        buffer.append(form as u8);
    }
}

/// Descriptor bounded by `min..=max` in increments of `step`
///
/// # Examples
///
/// ```
/// use ptpip_core::{ByteBuffer, PropertyCode};
/// use ptpip_types::property::{Availability, GetSet, PropertyHeader, RangeProperty};
///
/// let record = RangeProperty {
///     header: PropertyHeader {
///         code: PropertyCode::ExposureBiasCompensation,
///         get_set: GetSet::GetSet,
///         availability: Availability::GetSet,
///         factory: 0i16,
///         current: -300,
///     },
///     min: -3000,
///     max: 3000,
///     step: 300,
/// };
///
/// let buffer = record.to_buffer();
/// let mut offset = 0;
/// assert_eq!(RangeProperty::<i16>::decode(&buffer, &mut offset), Some(record));
/// assert_eq!(offset, buffer.len());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeProperty<T> {
    pub header: PropertyHeader<T>,
    pub min: T,
    pub max: T,
    pub step: T,
}

impl<T: PropertyValue> RangeProperty<T> {
    /// Decode a range descriptor at `*offset`
    pub fn decode(buffer: &ByteBuffer, offset: &mut usize) -> Option<Self> {
        let mut cursor = *offset;
        let (header, form) = PropertyHeader::decode(buffer, &mut cursor)?;
        if form != Form::Range {
            return None;
        }
        let record = Self::decode_tail(header, buffer, &mut cursor)?;
        *offset = cursor;
        Some(record)
    }

    fn decode_tail(header: PropertyHeader<T>, buffer: &ByteBuffer, cursor: &mut usize) -> Option<Self> {
        let min = buffer.read(cursor)?;
        let max = buffer.read(cursor)?;
        let step = buffer.read(cursor)?;
        Some(Self {
            header,
            min,
            max,
            step,
        })
    }

    /// Append the encoded descriptor
    pub fn encode(&self, buffer: &mut ByteBuffer) {
        self.header.encode(buffer, Form::Range);
        buffer.append(self.min);
        buffer.append(self.max);
        buffer.append(self.step);
    }

    /// Encode into a fresh buffer
    pub fn to_buffer(&self) -> ByteBuffer {
        let mut buffer = ByteBuffer::new();
        self.encode(&mut buffer);
        buffer
    }
}

/// Descriptor listing its legal values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumProperty<T> {
    pub header: PropertyHeader<T>,

    /// Every value the property can take
    pub available: Vec<T>,

    /// Values the device accepts right now
    pub supported: Vec<T>,
}

impl<T: PropertyValue> EnumProperty<T> {
    /// Decode an enumeration descriptor at `*offset`
    pub fn decode(buffer: &ByteBuffer, offset: &mut usize) -> Option<Self> {
        let mut cursor = *offset;
        let (header, form) = PropertyHeader::decode(buffer, &mut cursor)?;
        if form != Form::Enumeration {
            return None;
        }
        let record = Self::decode_tail(header, buffer, &mut cursor)?;
        *offset = cursor;
        Some(record)
    }

    fn decode_tail(header: PropertyHeader<T>, buffer: &ByteBuffer, cursor: &mut usize) -> Option<Self> {
        let available = buffer.read_array(cursor)?;
        let supported = buffer.read_array(cursor)?;
        Some(Self {
            header,
            available,
            supported,
        })
    }

    /// Append the encoded descriptor
    pub fn encode(&self, buffer: &mut ByteBuffer) {
        self.header.encode(buffer, Form::Enumeration);
        buffer.append_array(&self.available);
        buffer.append_array(&self.supported);
    }

    /// Encode into a fresh buffer
    pub fn to_buffer(&self) -> ByteBuffer {
        let mut buffer = ByteBuffer::new();
        self.encode(&mut buffer);
        buffer
    }
}

/// Descriptor with neither range nor enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherProperty<T> {
    pub header: PropertyHeader<T>,
}

impl<T: PropertyValue> OtherProperty<T> {
    /// Decode a form-less descriptor at `*offset`
    pub fn decode(buffer: &ByteBuffer, offset: &mut usize) -> Option<Self> {
        let mut cursor = *offset;
        let (header, form) = PropertyHeader::decode(buffer, &mut cursor)?;
        if form != Form::Other {
            return None;
        }
        *offset = cursor;
        Some(Self { header })
    }

    /// Append the encoded descriptor
    pub fn encode(&self, buffer: &mut ByteBuffer) {
        self.header.encode(buffer, Form::Other);
    }
}

/// A descriptor of any form for primitive `T`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceProperty<T> {
    Range(RangeProperty<T>),
    Enum(EnumProperty<T>),
    Other(OtherProperty<T>),
}

impl<T: PropertyValue> DeviceProperty<T> {
    /// Decode a descriptor of whatever form the flag names
    pub fn decode(buffer: &ByteBuffer, offset: &mut usize) -> Option<Self> {
        let mut cursor = *offset;
        let (header, form) = PropertyHeader::decode(buffer, &mut cursor)?;
        let property = match form {
            Form::Range => Self::Range(RangeProperty::decode_tail(header, buffer, &mut cursor)?),
            Form::Enumeration => Self::Enum(EnumProperty::decode_tail(header, buffer, &mut cursor)?),
            Form::Other => Self::Other(OtherProperty { header }),
        };
        *offset = cursor;
        Some(property)
    }

    /// Shared header fields
    pub fn header(&self) -> &PropertyHeader<T> {
        match self {
            Self::Range(p) => &p.header,
            Self::Enum(p) => &p.header,
            Self::Other(p) => &p.header,
        }
    }

    pub fn code(&self) -> PropertyCode {
        self.header().code
    }

    pub fn current(&self) -> T {
        self.header().current
    }

    pub fn form(&self) -> Form {
        match self {
            Self::Range(_) => Form::Range,
            Self::Enum(_) => Form::Enumeration,
            Self::Other(_) => Form::Other,
        }
    }

    /// Append the encoded descriptor
    pub fn encode(&self, buffer: &mut ByteBuffer) {
        match self {
            Self::Range(p) => p.encode(buffer),
            Self::Enum(p) => p.encode(buffer),
            Self::Other(p) => p.encode(buffer),
        }
    }
}

/// Descriptor of a string property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringProperty {
    pub code: PropertyCode,
    pub get_set: GetSet,
    pub availability: Availability,
    pub factory: String,
    pub current: String,
    pub form: Form,

    /// Enumerated values (empty unless `form` is [`Form::Enumeration`])
    pub available: Vec<String>,
    pub supported: Vec<String>,
}

impl StringProperty {
    pub fn code(&self) -> PropertyCode {
        self.code
    }

    fn read_string(buffer: &ByteBuffer, cursor: &mut usize) -> Option<String> {
        buffer.read_string(cursor, StringFraming::Counted, CharEncoding::Utf16)
    }

    fn read_strings(buffer: &ByteBuffer, cursor: &mut usize) -> Option<Vec<String>> {
        let count: u32 = buffer.read(cursor)?;
        (0..count).map(|_| Self::read_string(buffer, cursor)).collect()
    }

    /// Decode a string descriptor at `*offset`
    ///
    /// Strings have no range form; such a descriptor is rejected.
    pub fn decode(buffer: &ByteBuffer, offset: &mut usize) -> Option<Self> {
        let mut cursor = *offset;
        let code = PropertyCode::from(buffer.read::<u16>(&mut cursor)?);
        if buffer.read::<u16>(&mut cursor)? != u16::from(DataType::String) {
            return None;
        }
        let get_set = GetSet::from(buffer.read::<u8>(&mut cursor)?);
        let availability = Availability::from(buffer.read::<u8>(&mut cursor)?);
        let factory = Self::read_string(buffer, &mut cursor)?;
        let current = Self::read_string(buffer, &mut cursor)?;
        let form = Form::try_from(buffer.read::<u8>(&mut cursor)?).ok()?;

        let (available, supported) = match form {
            Form::Other => (Vec::new(), Vec::new()),
            Form::Enumeration => (
                Self::read_strings(buffer, &mut cursor)?,
                Self::read_strings(buffer, &mut cursor)?,
            ),
            Form::Range => return None,
        };

        *offset = cursor;
        Some(Self {
            code,
            get_set,
            availability,
            factory,
            current,
            form,
            available,
            supported,
        })
    }

    /// Append the encoded descriptor
    pub fn encode(&self, buffer: &mut ByteBuffer) {
        let write = |buffer: &mut ByteBuffer, text: &str| {
            buffer.append_string(text, StringFraming::Counted, CharEncoding::Utf16)
        };

        buffer.append(u16::from(self.code));
        buffer.append(u16::from(DataType::String));
        buffer.append(u8::from(self.get_set));
        buffer.append(u8::from(self.availability));
        write(buffer, &self.factory);
        write(buffer, &self.current);
        buffer.append(self.form as u8);

        if self.form == Form::Enumeration {
            for list in [&self.available, &self.supported] {
                buffer.append(list.len() as u32);
                for text in list {
                    write(buffer, text);
                }
            }
        }
    }
}

/// A descriptor whose primitive type was read from its own tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyDeviceProperty {
    Int8(DeviceProperty<i8>),
    UInt8(DeviceProperty<u8>),
    Int16(DeviceProperty<i16>),
    UInt16(DeviceProperty<u16>),
    Int32(DeviceProperty<i32>),
    UInt32(DeviceProperty<u32>),
    Int64(DeviceProperty<i64>),
    UInt64(DeviceProperty<u64>),
    String(StringProperty),
}

macro_rules! each_property {
    ($value:expr, $p:ident => $body:expr) => {
        match $value {
            AnyDeviceProperty::Int8($p) => $body,
            AnyDeviceProperty::UInt8($p) => $body,
            AnyDeviceProperty::Int16($p) => $body,
            AnyDeviceProperty::UInt16($p) => $body,
            AnyDeviceProperty::Int32($p) => $body,
            AnyDeviceProperty::UInt32($p) => $body,
            AnyDeviceProperty::Int64($p) => $body,
            AnyDeviceProperty::UInt64($p) => $body,
            AnyDeviceProperty::String($p) => $body,
        }
    };
}

impl AnyDeviceProperty {
    /// Decode a descriptor, choosing the primitive from its type tag
    pub fn decode(buffer: &ByteBuffer, offset: &mut usize) -> Option<Self> {
        let tag: u16 = buffer.read_at(*offset + 2)?;
        let data_type = DataType::try_from(tag).ok()?;
        let property = match data_type {
            DataType::Int8 => Self::Int8(DeviceProperty::decode(buffer, offset)?),
            DataType::UInt8 => Self::UInt8(DeviceProperty::decode(buffer, offset)?),
            DataType::Int16 => Self::Int16(DeviceProperty::decode(buffer, offset)?),
            DataType::UInt16 => Self::UInt16(DeviceProperty::decode(buffer, offset)?),
            DataType::Int32 => Self::Int32(DeviceProperty::decode(buffer, offset)?),
            DataType::UInt32 => Self::UInt32(DeviceProperty::decode(buffer, offset)?),
            DataType::Int64 => Self::Int64(DeviceProperty::decode(buffer, offset)?),
            DataType::UInt64 => Self::UInt64(DeviceProperty::decode(buffer, offset)?),
            DataType::String => Self::String(StringProperty::decode(buffer, offset)?),
        };
        Some(property)
    }

    pub fn code(&self) -> PropertyCode {
        each_property!(self, p => p.code())
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int8(_) => DataType::Int8,
            Self::UInt8(_) => DataType::UInt8,
            Self::Int16(_) => DataType::Int16,
            Self::UInt16(_) => DataType::UInt16,
            Self::Int32(_) => DataType::Int32,
            Self::UInt32(_) => DataType::UInt32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt64(_) => DataType::UInt64,
            Self::String(_) => DataType::String,
        }
    }

    /// Append the encoded descriptor
    pub fn encode(&self, buffer: &mut ByteBuffer) {
        each_property!(self, p => p.encode(buffer))
    }
}

impl fmt::Display for AnyDeviceProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Property[{}]({:?})", self.code(), self.data_type())
    }
}

/// Decode a bulk property listing: a `u64` record count then the records
///
/// Decoding stops at the first record that cannot be read, since nothing
/// after it can be located.
pub fn decode_all_properties(buffer: &ByteBuffer) -> Vec<AnyDeviceProperty> {
    let mut offset = 0;
    let Some(count) = buffer.read::<u64>(&mut offset) else {
        return Vec::new();
    };

    let mut properties = Vec::new();
    for index in 0..count {
        match AnyDeviceProperty::decode(buffer, &mut offset) {
            Some(property) => properties.push(property),
            None => {
                trace!(
                    "Stopped property listing at record {} of {} (offset {})",
                    index,
                    count,
                    offset
                );
                break;
            }
        }
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn header<T: PropertyValue>(code: PropertyCode, factory: T, current: T) -> PropertyHeader<T> {
        PropertyHeader {
            code,
            get_set: GetSet::GetSet,
            availability: Availability::GetSet,
            factory,
            current,
        }
    }

    fn range_round_trip<T: PropertyValue>(factory: T, current: T, min: T, max: T, step: T) {
        let record = RangeProperty {
            header: header(PropertyCode::Unrecognized(0xD2FE), factory, current),
            min,
            max,
            step,
        };
        let buffer = record.to_buffer();
        let mut offset = 0;
        assert_eq!(RangeProperty::<T>::decode(&buffer, &mut offset), Some(record));
        assert_eq!(offset, buffer.len());
    }

    fn enum_round_trip<T: PropertyValue>(current: T, available: Vec<T>, supported: Vec<T>) {
        let record = EnumProperty {
            header: header(PropertyCode::Iso, current, current),
            available,
            supported,
        };
        let buffer = record.to_buffer();
        let mut offset = 0;
        assert_eq!(EnumProperty::<T>::decode(&buffer, &mut offset), Some(record));
        assert_eq!(offset, buffer.len());
    }

    #[test]
    fn test_range_round_trip_each_width() {
        range_round_trip(0i8, -3, i8::MIN, i8::MAX, 1);
        range_round_trip(0u8, 50, 0, 100, 5);
        range_round_trip(0i16, -300, -3000, 3000, 300);
        range_round_trip(0u16, 5500, 2500, 9900, 100);
        range_round_trip(0i32, -1, i32::MIN, i32::MAX, 1);
        range_round_trip(0u32, 1, 0, u32::MAX, 1);
        range_round_trip(0i64, i64::MIN, i64::MIN, i64::MAX, 7);
        range_round_trip(0u64, 0, 0, u64::MAX, 1 << 40);
    }

    #[test]
    fn test_enum_round_trip_lengths() {
        enum_round_trip::<u16>(1, vec![], vec![]);
        enum_round_trip::<u16>(1, vec![1], vec![1]);
        enum_round_trip::<u32>(100, vec![100, 200, 400, 800, 1600], vec![100, 200, 400]);
        enum_round_trip::<i8>(-1, vec![-3, -2, -1, 0, 1, 2, 3], vec![0]);
        enum_round_trip::<u64>(u64::MAX, vec![u64::MAX], vec![]);
    }

    #[test]
    fn test_enum_layout() {
        let record = EnumProperty {
            header: header(PropertyCode::Iso, 100u32, 400),
            available: vec![100, 200],
            supported: vec![100],
        };
        let expected = ByteBuffer::from_hex(
            "1e d2 06 00 01 01 64 00 00 00 90 01 00 00 02
             02 00 00 00 64 00 00 00 c8 00 00 00
             01 00 00 00 64 00 00 00",
        )
        .unwrap();
        assert_eq!(record.to_buffer().to_vec(), expected.to_vec());
    }

    #[test]
    fn test_range_marker_byte() {
        let record = RangeProperty {
            header: header(PropertyCode::FNumber, 280u16, 400),
            min: 280,
            max: 2200,
            step: 10,
        };
        let buffer = record.to_buffer();
        // code + type + get/set + availability + factory + current
        assert_eq!(buffer.get(2 + 2 + 1 + 1 + 2 + 2), Some(0x01));
    }

    #[test]
    fn test_type_mismatch_fails_closed() {
        let record = RangeProperty {
            header: header(PropertyCode::FNumber, 280u16, 400),
            min: 280,
            max: 2200,
            step: 10,
        };
        let buffer = record.to_buffer();

        let mut offset = 0;
        assert_eq!(RangeProperty::<u32>::decode(&buffer, &mut offset), None);
        assert_eq!(RangeProperty::<i16>::decode(&buffer, &mut offset), None);
        assert_eq!(DeviceProperty::<u8>::decode(&buffer, &mut offset), None);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_form_mismatch_fails() {
        let record = EnumProperty {
            header: header(PropertyCode::WhiteBalance, 2u16, 2),
            available: vec![2, 4],
            supported: vec![2],
        };
        let buffer = record.to_buffer();
        let mut offset = 0;
        assert_eq!(RangeProperty::<u16>::decode(&buffer, &mut offset), None);
        assert_eq!(OtherProperty::<u16>::decode(&buffer, &mut offset), None);
        assert_eq!(
            DeviceProperty::<u16>::decode(&buffer, &mut offset),
            Some(DeviceProperty::Enum(record))
        );
    }

    #[test]
    fn test_truncated_enum_fails() {
        let record = EnumProperty {
            header: header(PropertyCode::Iso, 100u32, 100),
            available: vec![100, 200, 400],
            supported: vec![100, 200],
        };
        let mut buffer = record.to_buffer();
        buffer.slice(0, Some(buffer.len() - 1));
        let mut offset = 0;
        assert_eq!(EnumProperty::<u32>::decode(&buffer, &mut offset), None);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_other_form() {
        let record = OtherProperty {
            header: PropertyHeader {
                code: PropertyCode::BatteryLevel,
                get_set: GetSet::Get,
                availability: Availability::Get,
                factory: 0u8,
                current: 80,
            },
        };
        let mut buffer = ByteBuffer::new();
        record.encode(&mut buffer);
        assert_eq!(buffer.to_vec(), vec![0x01, 0x50, 0x02, 0x00, 0x00, 0x02, 0x00, 80, 0x00]);

        let mut offset = 0;
        let decoded = DeviceProperty::<u8>::decode(&buffer, &mut offset).unwrap();
        assert_eq!(decoded.form(), Form::Other);
        assert_eq!(decoded.current(), 80);
    }

    #[test]
    fn test_unrecognized_flags_survive() {
        let buffer = ByteBuffer::from_hex("0d d2 04 00 07 09 01 00 02 00 00").unwrap();
        let mut offset = 0;
        let property = DeviceProperty::<u16>::decode(&buffer, &mut offset).unwrap();
        assert_eq!(property.code(), PropertyCode::ShutterSpeed);
        assert_eq!(property.header().get_set, GetSet::Unrecognized(7));
        assert_eq!(property.header().availability, Availability::Unrecognized(9));
    }

    #[test]
    fn test_string_property() {
        let record = StringProperty {
            code: PropertyCode::Artist,
            get_set: GetSet::GetSet,
            availability: Availability::GetSet,
            factory: String::new(),
            current: "Jo".to_string(),
            form: Form::Enumeration,
            available: vec!["Jo".to_string(), "Al".to_string()],
            supported: vec!["Jo".to_string()],
        };
        let mut buffer = ByteBuffer::new();
        record.encode(&mut buffer);

        let mut offset = 0;
        let decoded = AnyDeviceProperty::decode(&buffer, &mut offset).unwrap();
        assert_eq!(decoded, AnyDeviceProperty::String(record));
        assert_eq!(offset, buffer.len());
    }

    #[test]
    fn test_any_property_dispatch() {
        let record = RangeProperty {
            header: header(PropertyCode::ExposureBiasCompensation, 0i16, -700),
            min: -5000,
            max: 5000,
            step: 300,
        };
        let buffer = record.to_buffer();
        let mut offset = 0;
        let property = AnyDeviceProperty::decode(&buffer, &mut offset).unwrap();
        assert_eq!(property.data_type(), DataType::Int16);
        assert_eq!(property.code(), PropertyCode::ExposureBiasCompensation);
        assert_eq!(property, AnyDeviceProperty::Int16(DeviceProperty::Range(record)));
    }

    #[test]
    fn test_any_property_unknown_type() {
        let buffer = ByteBuffer::from_hex("01 50 09 00 00 00").unwrap();
        let mut offset = 0;
        assert_eq!(AnyDeviceProperty::decode(&buffer, &mut offset), None);
    }

    #[test]
    fn test_decode_all_properties() {
        let mut buffer = ByteBuffer::new();
        buffer.append(3u64);
        EnumProperty {
            header: header(PropertyCode::Iso, 100u32, 200),
            available: vec![100, 200],
            supported: vec![100, 200],
        }
        .encode(&mut buffer);
        RangeProperty {
            header: header(PropertyCode::ColorTemperature, 5500u16, 5500),
            min: 2500,
            max: 9900,
            step: 100,
        }
        .encode(&mut buffer);
        OtherProperty {
            header: header(PropertyCode::Unrecognized(0xD2FF), 0u8, 1),
        }
        .encode(&mut buffer);

        let properties = decode_all_properties(&buffer);
        let codes: Vec<_> = properties.iter().map(|p| p.code()).collect();
        assert_eq!(
            codes,
            vec![
                PropertyCode::Iso,
                PropertyCode::ColorTemperature,
                PropertyCode::Unrecognized(0xD2FF)
            ]
        );
    }

    #[test]
    fn test_decode_all_stops_at_bad_record() {
        let mut buffer = ByteBuffer::new();
        buffer.append(3u64);
        OtherProperty {
            header: header(PropertyCode::FocusMode, 1u16, 2),
        }
        .encode(&mut buffer);
        buffer.append_bytes(&[0x00, 0x50, 0x42, 0x42]);

        let properties = decode_all_properties(&buffer);
        assert_eq!(properties.len(), 1);
        assert!(decode_all_properties(&ByteBuffer::new()).is_empty());
    }

    #[test]
    fn test_data_type_conversion() {
        assert_eq!(DataType::try_from(0x0006).unwrap(), DataType::UInt32);
        assert_eq!(u16::from(DataType::String), 0xFFFF);
        assert!(matches!(
            DataType::try_from(0x4002),
            Err(Error::UnknownDataType(0x4002))
        ));
    }

    proptest! {
        #[test]
        fn prop_range_round_trip_i32(factory: i32, current: i32, min: i32, max: i32, step: i32) {
            let record = RangeProperty {
                header: header(PropertyCode::FocalLength, factory, current),
                min,
                max,
                step,
            };
            let buffer = record.to_buffer();
            let mut offset = 0;
            prop_assert_eq!(DeviceProperty::<i32>::decode(&buffer, &mut offset), Some(DeviceProperty::Range(record)));
        }

        #[test]
        fn prop_enum_round_trip_u16(
            available in proptest::collection::vec(any::<u16>(), 0..24),
            supported in proptest::collection::vec(any::<u16>(), 0..24),
        ) {
            let record = EnumProperty {
                header: header(PropertyCode::ExposureProgramMode, 1u16, 2),
                available,
                supported,
            };
            let buffer = record.to_buffer();
            let mut offset = 0;
            prop_assert_eq!(EnumProperty::<u16>::decode(&buffer, &mut offset), Some(record));
            prop_assert_eq!(offset, buffer.len());
        }
    }
}
