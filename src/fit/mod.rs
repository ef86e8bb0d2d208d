//! # FIT Track Decoder
//!
//! Decodes the binary FIT activity format into parallel sample arrays.
//!
//! ## Stream layout
//! 1. Fixed header (12 or 14 bytes) with the `.FIT` marker and payload size
//! 2. Payload of back-to-back messages, each introduced by a record header byte:
//!    - definition messages bind a layout to one of 16 local message types
//!    - data messages are read with the layout currently bound to their local type
//! 3. Trailing CRC-16 over everything before it
//!
//! Only record messages (timestamp, position, altitude) and session messages
//! (total calories) are interpreted. Every other message is skipped by its
//! declared width, so stream alignment never depends on the profile.

mod crc;
mod definition;
mod header;
pub mod profile;
mod reader;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::geo_utils::polyline_length;
use crate::GpsPoint;

pub use crc::checksum;
pub use definition::{BaseType, Endianness, FieldDefinition, MessageDefinition};
pub use header::FileHeader;

use reader::PayloadReader;

/// Number of local message type slots.
pub const LOCAL_MESSAGE_TYPES: usize = 16;

const COMPRESSED_HEADER_FLAG: u8 = 0x80;
const DEFINITION_FLAG: u8 = 0x40;
const DEVELOPER_DATA_FLAG: u8 = 0x20;
const LOCAL_TYPE_MASK: u8 = 0x0F;
const COMPRESSED_LOCAL_TYPE_MASK: u8 = 0x03;
const COMPRESSED_TIME_MASK: u8 = 0x1F;

/// How checksum mismatches are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumPolicy {
    /// Log a warning and keep decoding
    #[default]
    Advisory,
    /// Fail with [`DecodeError::ChecksumMismatch`]
    Strict,
}

/// Configuration for FIT decoding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Handling of header and file CRC mismatches
    pub checksum_policy: ChecksumPolicy,
}

impl DecodeConfig {
    /// Config that rejects files with a bad checksum.
    pub fn strict() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::Strict,
        }
    }
}

/// Parallel sample arrays decoded from a FIT file.
///
/// Each record message contributes exactly one sample; fields that were
/// absent or carried an invalid sentinel are NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedTrack {
    /// Unix timestamps in seconds
    pub times: Vec<f64>,
    /// Positions in degrees
    pub coordinates: Vec<GpsPoint>,
    /// Altitudes in meters
    pub altitudes: Vec<f64>,
    /// Total calories of the last session message, 0 if none
    pub calories: u32,
}

impl DecodedTrack {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Distance in meters along all samples with a position.
    pub fn total_distance(&self) -> f64 {
        polyline_length(&self.coordinates)
    }

    /// Time of the first sample with a timestamp.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.times.iter().find(|t| t.is_finite()).and_then(|&t| to_datetime(t))
    }

    /// Time of the last sample with a timestamp.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.times.iter().rev().find(|t| t.is_finite()).and_then(|&t| to_datetime(t))
    }

    fn push_sample(&mut self, time: f64, coordinate: GpsPoint, altitude: f64) {
        self.times.push(time);
        self.coordinates.push(coordinate);
        self.altitudes.push(altitude);
    }
}

fn to_datetime(unix_seconds: f64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(unix_seconds.trunc() as i64, 0)
}

/// Decode a FIT byte stream with the default (advisory checksum) config.
///
/// # Example
/// ```
/// use sportgems::fit::decode_track_file;
///
/// let err = decode_track_file(b"not a fit file").unwrap_err();
/// println!("{}", err);
/// ```
pub fn decode_track_file(bytes: &[u8]) -> Result<DecodedTrack, DecodeError> {
    decode_track_file_with_config(bytes, &DecodeConfig::default())
}

/// Decode a FIT byte stream.
pub fn decode_track_file_with_config(
    bytes: &[u8],
    config: &DecodeConfig,
) -> Result<DecodedTrack, DecodeError> {
    let header = FileHeader::parse(bytes)?;
    header.validate_length(bytes.len())?;
    debug!(
        "[FitDecoder] header: protocol {:#04x}, profile {}, payload {} bytes",
        header.protocol_version, header.profile_version, header.data_size
    );

    if let Some(stored) = header.header_crc {
        let computed = crc::checksum(&bytes[..header::HEADER_SIZE_LEGACY as usize]);
        verify_checksum("header", stored, computed, config.checksum_policy)?;
    }

    let payload = header.payload_range();
    let stored = u16::from_le_bytes([bytes[payload.end], bytes[payload.end + 1]]);
    let computed = crc::checksum(&bytes[..payload.end]);
    verify_checksum("file", stored, computed, config.checksum_policy)?;

    let mut decoder = TrackDecoder::new();
    decoder.run(&bytes[payload.clone()], payload.start)?;
    let track = decoder.track;

    info!(
        "[FitDecoder] Decoded {} samples, {} kcal, start {}",
        track.len(),
        track.calories,
        track
            .start_time()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string())
    );
    Ok(track)
}

fn verify_checksum(
    region: &'static str,
    stored: u16,
    computed: u16,
    policy: ChecksumPolicy,
) -> Result<(), DecodeError> {
    if stored == computed {
        return Ok(());
    }
    match policy {
        ChecksumPolicy::Advisory => {
            warn!(
                "[FitDecoder] {} checksum mismatch (stored {:#06x}, computed {:#06x}), continuing",
                region, stored, computed
            );
            Ok(())
        }
        ChecksumPolicy::Strict => Err(DecodeError::ChecksumMismatch {
            region,
            stored,
            computed,
        }),
    }
}

/// Rebuild a full timestamp from a 5-bit compressed offset.
fn expand_compressed_timestamp(last: u32, offset: u8) -> u32 {
    let offset = u32::from(offset & COMPRESSED_TIME_MASK);
    let base = (last & !u32::from(COMPRESSED_TIME_MASK)).wrapping_add(offset);
    if offset >= last & u32::from(COMPRESSED_TIME_MASK) {
        base
    } else {
        base.wrapping_add(u32::from(COMPRESSED_TIME_MASK) + 1)
    }
}

/// Parse state threaded through the whole payload.
struct TrackDecoder {
    /// Layout currently bound to each local message type
    definitions: [Option<MessageDefinition>; LOCAL_MESSAGE_TYPES],
    /// Last full timestamp seen, base for compressed timestamps
    last_timestamp: Option<u32>,
    track: DecodedTrack,
}

impl TrackDecoder {
    fn new() -> Self {
        Self {
            definitions: Default::default(),
            last_timestamp: None,
            track: DecodedTrack::default(),
        }
    }

    fn run(&mut self, payload: &[u8], base_offset: usize) -> Result<(), DecodeError> {
        let mut reader = PayloadReader::new(payload, base_offset);
        while !reader.is_empty() {
            let offset = reader.offset();
            let record_header = reader.read_u8()?;

            if record_header & COMPRESSED_HEADER_FLAG != 0 {
                let local_type = (record_header >> 5) & COMPRESSED_LOCAL_TYPE_MASK;
                let timestamp = self
                    .last_timestamp
                    .map(|last| expand_compressed_timestamp(last, record_header));
                self.read_data_message(&mut reader, offset, local_type, timestamp)?;
            } else if record_header & DEFINITION_FLAG != 0 {
                let local_type = record_header & LOCAL_TYPE_MASK;
                let has_developer_data = record_header & DEVELOPER_DATA_FLAG != 0;
                let definition = MessageDefinition::read(&mut reader, has_developer_data)?;
                debug!(
                    "[FitDecoder] local type {} -> global {} ({} fields, {} bytes)",
                    local_type,
                    definition.global_message,
                    definition.fields.len(),
                    definition.data_size()
                );
                self.definitions[local_type as usize] = Some(definition);
            } else {
                let local_type = record_header & LOCAL_TYPE_MASK;
                self.read_data_message(&mut reader, offset, local_type, None)?;
            }
        }
        Ok(())
    }

    fn read_data_message(
        &mut self,
        reader: &mut PayloadReader<'_>,
        offset: usize,
        local_type: u8,
        compressed_timestamp: Option<u32>,
    ) -> Result<(), DecodeError> {
        let definition = self.definitions[local_type as usize]
            .as_ref()
            .ok_or(DecodeError::UndefinedLocalType { offset, local_type })?;
        let data = reader.take(definition.data_size())?;

        let mut timestamp = compressed_timestamp;
        let mut latitude = None;
        let mut longitude = None;
        let mut altitude = None;
        let mut enhanced_altitude = None;
        let mut calories = None;

        for (field, raw) in definition.fields_in(data) {
            let value = field.base_type.decode(raw, definition.endianness);
            match (definition.global_message, field.number) {
                (_, profile::FIELD_TIMESTAMP) => {
                    if let Some(v) = value {
                        timestamp = Some(v as u32);
                    }
                }
                (profile::MESG_RECORD, profile::record::POSITION_LAT) => latitude = value,
                (profile::MESG_RECORD, profile::record::POSITION_LONG) => longitude = value,
                (profile::MESG_RECORD, profile::record::ALTITUDE) => altitude = value,
                (profile::MESG_RECORD, profile::record::ENHANCED_ALTITUDE) => {
                    enhanced_altitude = value
                }
                (profile::MESG_SESSION, profile::session::TOTAL_CALORIES) => calories = value,
                _ => {}
            }
        }

        if timestamp.is_some() {
            self.last_timestamp = timestamp;
        }

        match definition.global_message {
            profile::MESG_RECORD => {
                let time = timestamp
                    .map(|t| profile::fit_to_unix_seconds(f64::from(t)))
                    .unwrap_or(f64::NAN);
                let coordinate = GpsPoint::new(
                    latitude
                        .map(profile::semicircles_to_degrees)
                        .unwrap_or(f64::NAN),
                    longitude
                        .map(profile::semicircles_to_degrees)
                        .unwrap_or(f64::NAN),
                );
                let altitude = enhanced_altitude
                    .or(altitude)
                    .map(profile::raw_altitude_to_meters)
                    .unwrap_or(f64::NAN);
                self.track.push_sample(time, coordinate, altitude);
            }
            profile::MESG_SESSION => {
                if let Some(kcal) = calories {
                    self.track.calories = kcal as u32;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
