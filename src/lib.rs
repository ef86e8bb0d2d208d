//! # Sportgems
//!
//! Find the gems of a recorded sport activity: the fastest section and the
//! steepest climb covering at least a given distance.
//!
//! This library provides:
//! - Optimal-window search over time, coordinate and altitude sequences
//! - A decoder for the FIT activity file format
//! - Gem curves over a ladder of distances
//!
//! ## Features
//!
//! - **`parallel`** - Evaluate gem curve distances in parallel with rayon
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use sportgems::{find_best_climb_section, find_fastest_section, GpsPoint};
//!
//! let coordinates = vec![
//!     GpsPoint::new(48.123, 9.35),
//!     GpsPoint::new(48.123, 9.36),
//!     GpsPoint::new(48.123, 9.37),
//!     GpsPoint::new(48.123, 9.38),
//! ];
//! let times = vec![0.0, 120.0, 230.0, 360.0];
//! let altitudes = vec![400.0, 420.0, 415.0, 450.0];
//!
//! let fastest = find_fastest_section(1000.0, &times, &coordinates).unwrap();
//! println!("{}..={} at {:.1} m/s", fastest.start, fastest.end, fastest.metric);
//!
//! let climb = find_best_climb_section(1000.0, &times, &coordinates, &altitudes).unwrap();
//! println!("{}..={} gaining {:.0} m", climb.start, climb.end, climb.metric);
//! ```
//!
//! Reported indices always refer to the input sequences. Samples with a NaN
//! time, coordinate component or (for climbs) altitude are skipped without
//! shifting indices.

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{DecodeError, GemError, Result, SearchError};

// Geographic utilities (haversine distance, missing-value predicates)
pub mod geo_utils;

// Altitude cleanup
pub mod altitude;

// FIT file decoding
pub mod fit;
pub use fit::{
    decode_track_file, decode_track_file_with_config, ChecksumPolicy, DecodeConfig, DecodedTrack,
};

// Optimal-window search
pub mod search;
pub use search::{find_best_climb_section, find_fastest_section, Objective, Section};

// Gem curves over many distances
pub mod curves;
pub use curves::{
    compute_climb_curve, compute_velocity_curve, CurvePoint, GemCurve, STANDARD_GEM_DISTANCES,
};

// Read-decode-search conveniences for files on disk
pub mod track_file;
pub use track_file::{
    find_best_climb_section_in_file, find_fastest_section_in_file, parse_track_file,
    parse_track_file_with_config,
};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude in degrees.
///
/// Either component may be NaN, which marks the sample as missing.
///
/// # Example
/// ```
/// use sportgems::GpsPoint;
/// let point = GpsPoint::new(48.123, 9.35);
/// assert!(!point.is_missing());
/// assert!(GpsPoint::new(f64::NAN, 9.35).is_missing());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// A point with both components missing.
    pub fn missing() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    /// True if either component is NaN.
    pub fn is_missing(&self) -> bool {
        geo_utils::is_missing_coordinate(self)
    }
}

impl From<(f64, f64)> for GpsPoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}
