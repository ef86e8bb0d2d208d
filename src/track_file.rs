//! File conveniences: read a FIT file from disk, decode it and search it.

use std::path::Path;

use log::debug;

use crate::altitude::{remove_outliers, MAX_RELATIVE_ALTITUDE_JUMP};
use crate::error::Result;
use crate::fit::{decode_track_file_with_config, DecodeConfig, DecodedTrack};
use crate::search::{find_best_climb_section, find_fastest_section, Section};

/// Read and decode a FIT file with the default [`DecodeConfig`].
pub fn parse_track_file(path: impl AsRef<Path>) -> Result<DecodedTrack> {
    parse_track_file_with_config(path, &DecodeConfig::default())
}

/// Read and decode a FIT file.
pub fn parse_track_file_with_config(
    path: impl AsRef<Path>,
    config: &DecodeConfig,
) -> Result<DecodedTrack> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(
        "[TrackFile] Read {} bytes from {}",
        bytes.len(),
        path.display()
    );
    Ok(decode_track_file_with_config(&bytes, config)?)
}

/// Decode a FIT file and find its fastest section of at least
/// `desired_distance` meters.
pub fn find_fastest_section_in_file(
    desired_distance: f64,
    path: impl AsRef<Path>,
) -> Result<Section> {
    let track = parse_track_file(path)?;
    Ok(find_fastest_section(
        desired_distance,
        &track.times,
        &track.coordinates,
    )?)
}

/// Decode a FIT file and find its best climb of at least `desired_distance`
/// meters.
///
/// Altitude spikes are removed with [`remove_outliers`] before searching.
pub fn find_best_climb_section_in_file(
    desired_distance: f64,
    path: impl AsRef<Path>,
) -> Result<Section> {
    let track = parse_track_file(path)?;
    let altitudes = remove_outliers(&track.altitudes, MAX_RELATIVE_ALTITUDE_JUMP);
    Ok(find_best_climb_section(
        desired_distance,
        &track.times,
        &track.coordinates,
        &altitudes,
    )?)
}
