//! Shared helpers for integration tests: a minimal FIT encoder and a
//! synthetic three-segment track.

#![allow(dead_code)]

use sportgems::fit::checksum;
use sportgems::GpsPoint;

/// Unix time of the first synthetic sample (2020-09-13T12:26:40Z).
pub const START_UNIX: f64 = 1_600_000_000.0;

const FIT_EPOCH_OFFSET: f64 = 631_065_600.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parallel sample arrays as a search takes them.
#[derive(Debug, Clone)]
pub struct Track {
    pub times: Vec<f64>,
    pub coordinates: Vec<GpsPoint>,
    pub altitudes: Vec<f64>,
}

/// 300 samples at 1 Hz heading east along 48°N.
///
/// Segment one moves ~14.9 m/s climbing 1 m per sample, segment two moves
/// ~18.6 m/s climbing 2 m per sample, segment three moves ~14.9 m/s
/// descending 1 m per sample. Each segment starts on the last point of the
/// previous one.
pub fn synthetic_track() -> Track {
    let mut coordinates = Vec::with_capacity(300);
    let mut altitudes = Vec::with_capacity(300);
    let mut origin = GpsPoint::new(48.0, 8.0);
    let mut altitude = 243.0;
    for (step, rise) in [(0.0002, 1.0), (0.00025, 2.0), (0.0002, -1.0)] {
        for i in 0..100 {
            coordinates.push(GpsPoint::new(
                origin.latitude,
                origin.longitude + i as f64 * step,
            ));
            altitude += rise;
            altitudes.push(altitude);
        }
        origin = *coordinates.last().unwrap();
    }
    let times = (0..300).map(|i| START_UNIX + i as f64).collect();
    Track {
        times,
        coordinates,
        altitudes,
    }
}

/// Encode a track as a FIT file with one record per sample and an optional
/// session summary. NaN values are written as invalid sentinels.
pub fn encode_fit(track: &Track, calories: Option<u16>) -> Vec<u8> {
    let mut payload = Vec::new();

    // local 0: record (timestamp, lat, long, enhanced altitude)
    payload.extend_from_slice(&[0x40, 0, 0]);
    payload.extend_from_slice(&20u16.to_le_bytes());
    payload.extend_from_slice(&[4, 253, 4, 0x86, 0, 4, 0x85, 1, 4, 0x85, 78, 4, 0x86]);

    for i in 0..track.times.len() {
        let point = track.coordinates[i];
        payload.push(0x00);
        payload.extend_from_slice(&encode_time(track.times[i]).to_le_bytes());
        payload.extend_from_slice(&encode_degrees(point.latitude).to_le_bytes());
        payload.extend_from_slice(&encode_degrees(point.longitude).to_le_bytes());
        payload.extend_from_slice(&encode_altitude(track.altitudes[i]).to_le_bytes());
    }

    if let Some(kcal) = calories {
        // local 1: session (total calories)
        payload.extend_from_slice(&[0x41, 0, 0]);
        payload.extend_from_slice(&18u16.to_le_bytes());
        payload.extend_from_slice(&[1, 11, 2, 0x84]);
        payload.push(0x01);
        payload.extend_from_slice(&kcal.to_le_bytes());
    }

    wrap_payload(&payload)
}

/// Add a 14-byte header and both checksums around a message payload.
pub fn wrap_payload(payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![14, 0x20];
    bytes.extend_from_slice(&2195u16.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b".FIT");
    let header_crc = checksum(&bytes);
    bytes.extend_from_slice(&header_crc.to_le_bytes());
    bytes.extend_from_slice(payload);
    let file_crc = checksum(&bytes);
    bytes.extend_from_slice(&file_crc.to_le_bytes());
    bytes
}

fn encode_time(unix: f64) -> u32 {
    if unix.is_nan() {
        u32::MAX
    } else {
        (unix - FIT_EPOCH_OFFSET) as u32
    }
}

fn encode_degrees(degrees: f64) -> i32 {
    if degrees.is_nan() {
        i32::MAX
    } else {
        (degrees * 2_147_483_648.0 / 180.0).round() as i32
    }
}

fn encode_altitude(meters: f64) -> u32 {
    if meters.is_nan() {
        u32::MAX
    } else {
        ((meters + 500.0) * 5.0).round() as u32
    }
}
