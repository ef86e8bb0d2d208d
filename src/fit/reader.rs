//! Bounds-checked cursor over the message payload.

use crate::error::{DecodeError, OptionExt};

/// Cursor over the payload bytes. Offsets in errors are file offsets.
pub struct PayloadReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    base_offset: usize,
}

impl<'a> PayloadReader<'a> {
    /// `base_offset` is the file offset of `bytes[0]`.
    pub fn new(bytes: &'a [u8], base_offset: usize) -> Self {
        Self {
            bytes,
            pos: 0,
            base_offset,
        }
    }

    /// File offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.base_offset + self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    /// Consume exactly `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.bytes.len() - self.pos;
        let slice = self
            .bytes
            .get(self.pos..self.pos + len)
            .ok_or_eof(self.offset(), len.saturating_sub(remaining))?;
        self.pos += len;
        Ok(slice)
    }
}
