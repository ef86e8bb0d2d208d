//! Definition messages: per-local-type field layouts and base types.

use super::reader::PayloadReader;
use crate::error::DecodeError;

/// Byte order declared by a definition message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// FIT base types. The low five bits of the base type byte select the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Enum,
    SInt8,
    UInt8,
    SInt16,
    UInt16,
    SInt32,
    UInt32,
    String,
    Float32,
    Float64,
    UInt8z,
    UInt16z,
    UInt32z,
    Byte,
    SInt64,
    UInt64,
    UInt64z,
}

impl BaseType {
    /// Unknown base type numbers are treated as opaque bytes.
    pub fn from_byte(byte: u8) -> Self {
        match byte & 0x1F {
            0 => BaseType::Enum,
            1 => BaseType::SInt8,
            2 => BaseType::UInt8,
            3 => BaseType::SInt16,
            4 => BaseType::UInt16,
            5 => BaseType::SInt32,
            6 => BaseType::UInt32,
            7 => BaseType::String,
            8 => BaseType::Float32,
            9 => BaseType::Float64,
            10 => BaseType::UInt8z,
            11 => BaseType::UInt16z,
            12 => BaseType::UInt32z,
            14 => BaseType::SInt64,
            15 => BaseType::UInt64,
            16 => BaseType::UInt64z,
            _ => BaseType::Byte,
        }
    }

    /// Width in bytes of a single value.
    pub fn size(self) -> usize {
        match self {
            BaseType::Enum
            | BaseType::SInt8
            | BaseType::UInt8
            | BaseType::String
            | BaseType::UInt8z
            | BaseType::Byte => 1,
            BaseType::SInt16 | BaseType::UInt16 | BaseType::UInt16z => 2,
            BaseType::SInt32 | BaseType::UInt32 | BaseType::Float32 | BaseType::UInt32z => 4,
            BaseType::Float64 | BaseType::SInt64 | BaseType::UInt64 | BaseType::UInt64z => 8,
        }
    }

    /// Interpret a single scalar value.
    ///
    /// Returns `None` for the type's invalid sentinel, for strings, and for
    /// fields whose width is not exactly one value (arrays).
    pub fn decode(self, raw: &[u8], endianness: Endianness) -> Option<f64> {
        if raw.len() != self.size() {
            return None;
        }
        match self {
            BaseType::Enum | BaseType::UInt8 | BaseType::Byte => {
                Some(raw[0]).filter(|&v| v != u8::MAX).map(f64::from)
            }
            BaseType::UInt8z => Some(raw[0]).filter(|&v| v != 0).map(f64::from),
            BaseType::SInt8 => Some(raw[0] as i8).filter(|&v| v != i8::MAX).map(f64::from),
            BaseType::SInt16 => {
                let v = i16::from_le_bytes(ordered(raw, endianness)?);
                (v != i16::MAX).then_some(f64::from(v))
            }
            BaseType::UInt16 => {
                let v = u16::from_le_bytes(ordered(raw, endianness)?);
                (v != u16::MAX).then_some(f64::from(v))
            }
            BaseType::UInt16z => {
                let v = u16::from_le_bytes(ordered(raw, endianness)?);
                (v != 0).then_some(f64::from(v))
            }
            BaseType::SInt32 => {
                let v = i32::from_le_bytes(ordered(raw, endianness)?);
                (v != i32::MAX).then_some(f64::from(v))
            }
            BaseType::UInt32 => {
                let v = u32::from_le_bytes(ordered(raw, endianness)?);
                (v != u32::MAX).then_some(f64::from(v))
            }
            BaseType::UInt32z => {
                let v = u32::from_le_bytes(ordered(raw, endianness)?);
                (v != 0).then_some(f64::from(v))
            }
            BaseType::SInt64 => {
                let v = i64::from_le_bytes(ordered(raw, endianness)?);
                (v != i64::MAX).then_some(v as f64)
            }
            BaseType::UInt64 => {
                let v = u64::from_le_bytes(ordered(raw, endianness)?);
                (v != u64::MAX).then_some(v as f64)
            }
            BaseType::UInt64z => {
                let v = u64::from_le_bytes(ordered(raw, endianness)?);
                (v != 0).then_some(v as f64)
            }
            BaseType::Float32 => {
                let bits = u32::from_le_bytes(ordered(raw, endianness)?);
                (bits != u32::MAX).then(|| f64::from(f32::from_bits(bits)))
            }
            BaseType::Float64 => {
                let bits = u64::from_le_bytes(ordered(raw, endianness)?);
                (bits != u64::MAX).then(|| f64::from_bits(bits))
            }
            BaseType::String => None,
        }
    }
}

/// Copy `raw` into little-endian order.
fn ordered<const N: usize>(raw: &[u8], endianness: Endianness) -> Option<[u8; N]> {
    let mut bytes: [u8; N] = raw.try_into().ok()?;
    if endianness == Endianness::Big {
        bytes.reverse();
    }
    Some(bytes)
}

/// One field of a definition message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub number: u8,
    pub size: u8,
    pub base_type: BaseType,
}

/// Layout of the data messages of one local message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinition {
    pub global_message: u16,
    pub endianness: Endianness,
    pub fields: Vec<FieldDefinition>,
    /// Total width of developer fields, consumed but never interpreted
    pub developer_data_size: usize,
}

impl MessageDefinition {
    /// Read a definition message body (after its record header byte).
    pub fn read(
        reader: &mut PayloadReader<'_>,
        has_developer_data: bool,
    ) -> Result<Self, DecodeError> {
        let fixed = reader.take(5)?;
        // fixed[0] is reserved
        let endianness = if fixed[1] == 0 {
            Endianness::Little
        } else {
            Endianness::Big
        };
        let global_bytes = [fixed[2], fixed[3]];
        let global_message = match endianness {
            Endianness::Little => u16::from_le_bytes(global_bytes),
            Endianness::Big => u16::from_be_bytes(global_bytes),
        };

        let field_count = fixed[4] as usize;
        let fields = reader
            .take(field_count * 3)?
            .chunks_exact(3)
            .map(|chunk| FieldDefinition {
                number: chunk[0],
                size: chunk[1],
                base_type: BaseType::from_byte(chunk[2]),
            })
            .collect();

        let developer_data_size = if has_developer_data {
            let dev_count = reader.read_u8()? as usize;
            reader
                .take(dev_count * 3)?
                .chunks_exact(3)
                .map(|chunk| chunk[1] as usize)
                .sum()
        } else {
            0
        };

        Ok(Self {
            global_message,
            endianness,
            fields,
            developer_data_size,
        })
    }

    /// Bytes occupied by one data message of this type (excluding its header byte).
    pub fn data_size(&self) -> usize {
        self.fields.iter().map(|f| f.size as usize).sum::<usize>() + self.developer_data_size
    }

    /// Pair each field with its raw bytes in a data message body.
    ///
    /// `data` must be at least [`MessageDefinition::data_size`] bytes long.
    pub fn fields_in<'d>(
        &'d self,
        data: &'d [u8],
    ) -> impl Iterator<Item = (&'d FieldDefinition, &'d [u8])> + 'd {
        self.fields.iter().scan(0usize, move |offset, field| {
            let start = *offset;
            *offset += field.size as usize;
            data.get(start..*offset).map(|raw| (field, raw))
        })
    }
}
