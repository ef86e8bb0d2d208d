//! FIT file header.

use std::ops::Range;

use crate::error::DecodeError;

/// Header size without the optional header CRC.
pub const HEADER_SIZE_LEGACY: u8 = 12;
/// Header size including the header CRC.
pub const HEADER_SIZE_WITH_CRC: u8 = 14;
/// Bytes of the trailing file CRC.
pub const FILE_CRC_SIZE: usize = 2;

const MAGIC: &[u8; 4] = b".FIT";

/// Parsed fixed-size file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub header_size: u8,
    pub protocol_version: u8,
    pub profile_version: u16,
    /// Declared payload size in bytes (excluding header and file CRC)
    pub data_size: u32,
    /// Header CRC, `None` when absent or stored as 0 (not computed)
    pub header_crc: Option<u16>,
}

impl FileHeader {
    /// Parse and validate the header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let header_size = *bytes.first().ok_or(DecodeError::HeaderTooShort {
            available: 0,
            required: HEADER_SIZE_LEGACY as usize,
        })?;

        if header_size != HEADER_SIZE_LEGACY && header_size != HEADER_SIZE_WITH_CRC {
            return Err(DecodeError::UnsupportedHeaderSize(header_size));
        }
        if bytes.len() < header_size as usize {
            return Err(DecodeError::HeaderTooShort {
                available: bytes.len(),
                required: header_size as usize,
            });
        }
        if &bytes[8..12] != MAGIC {
            return Err(DecodeError::BadMagic);
        }

        let header_crc = if header_size == HEADER_SIZE_WITH_CRC {
            Some(u16::from_le_bytes([bytes[12], bytes[13]])).filter(|&crc| crc != 0)
        } else {
            None
        };

        Ok(Self {
            header_size,
            protocol_version: bytes[1],
            profile_version: u16::from_le_bytes([bytes[2], bytes[3]]),
            data_size: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            header_crc,
        })
    }

    /// Check that `total_len` is exactly header + payload + file CRC.
    pub fn validate_length(&self, total_len: usize) -> Result<(), DecodeError> {
        let framing = self.header_size as usize + FILE_CRC_SIZE;
        let declared = self.data_size as usize;
        if total_len != framing + declared {
            return Err(DecodeError::PayloadSizeMismatch {
                declared,
                actual: total_len.saturating_sub(framing),
            });
        }
        Ok(())
    }

    /// Byte range of the message payload within the file.
    pub fn payload_range(&self) -> Range<usize> {
        let start = self.header_size as usize;
        start..start + self.data_size as usize
    }
}
