//! Unified error handling for sportgems.
//!
//! Every failure is a deterministic input condition, so errors carry a
//! specific kind the caller can match on:
//! - [`SearchError`]: the input arrays cannot satisfy a section search
//! - [`DecodeError`]: the FIT byte stream is corrupt or truncated
//! - [`GemError`]: umbrella type for the file conveniences, which may also hit I/O

use thiserror::Error;

/// Failure of a section search over sample arrays.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The parallel input sequences do not have the same length.
    #[error("Input data lists must be of equal length.")]
    InconsistentLength,
    /// The requested section distance is zero, negative or not a number.
    #[error("desired_distance must be greater than 0.")]
    InvalidDesiredDistance,
    /// Fewer than two samples remain once missing values are dropped.
    #[error("Input data must consist of at least 2 not null data points.")]
    TooFewDataPoints,
    /// The whole track is shorter than the requested section distance.
    #[error("Distance of provided input data is too small for requested desired distance.")]
    DistanceTooSmall,
    /// No qualifying window gains any altitude.
    #[error("Could not find proper section, check quality of input data.")]
    NoSectionFound,
}

/// Failure while decoding a FIT byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer is shorter than the fixed file header.
    #[error("file header is truncated: {available} bytes available, {required} required")]
    HeaderTooShort { available: usize, required: usize },
    /// The header declares a size other than 12 or 14 bytes.
    #[error("unsupported header size {0}")]
    UnsupportedHeaderSize(u8),
    /// Bytes 8..12 are not the `.FIT` marker.
    #[error("missing .FIT marker in file header")]
    BadMagic,
    /// The declared payload size does not match the buffer length.
    #[error("declared payload of {declared} bytes does not match the {actual} bytes present")]
    PayloadSizeMismatch { declared: usize, actual: usize },
    /// A message would read past the end of the payload.
    #[error("unexpected end of payload at offset {offset}: {needed} more bytes needed")]
    UnexpectedEof { offset: usize, needed: usize },
    /// A data message references a local type that was never defined.
    #[error("data message at offset {offset} uses undefined local message type {local_type}")]
    UndefinedLocalType { offset: usize, local_type: u8 },
    /// A checksum did not verify and checksums are strictly enforced.
    #[error("{region} checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch {
        region: &'static str,
        stored: u16,
        computed: u16,
    },
}

/// Error type of operations that combine file access, decoding and search.
#[derive(Debug, Error)]
pub enum GemError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("failed to decode FIT file: {0}")]
    Decode(#[from] DecodeError),
    #[error("failed to read track file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sportgems operations.
pub type Result<T> = std::result::Result<T, GemError>;

/// Extension trait for turning short reads into decode errors.
pub trait OptionExt<T> {
    /// Convert `None` into [`DecodeError::UnexpectedEof`] at `offset`.
    fn ok_or_eof(self, offset: usize, needed: usize) -> std::result::Result<T, DecodeError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_eof(self, offset: usize, needed: usize) -> std::result::Result<T, DecodeError> {
        self.ok_or(DecodeError::UnexpectedEof { offset, needed })
    }
}
