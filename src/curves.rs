//! Gem curves: the best section of a track for a ladder of distances.
//!
//! A gem curve runs the velocity or climb search once per distance and keeps
//! every result, which answers questions like "what was my fastest 1k, 5k and
//! half marathon inside this activity".
//!
//! ## Example
//! ```rust
//! use sportgems::curves::compute_velocity_curve;
//! use sportgems::GpsPoint;
//!
//! let coords: Vec<GpsPoint> = (0..50)
//!     .map(|i| GpsPoint::new(48.0, 8.0 + i as f64 * 0.0005))
//!     .collect();
//! let times: Vec<f64> = (0..50).map(|i| i as f64 * 10.0).collect();
//!
//! let curve = compute_velocity_curve(&times, &coords, &[100.0, 1000.0, 50_000.0]).unwrap();
//! assert!(curve.section_at(1000.0).is_some());
//! assert!(curve.section_at(50_000.0).is_none()); // track too short
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::SearchError;
use crate::search::{find_best_climb_section, find_fastest_section, Objective, Section};
use crate::GpsPoint;

/// Standard gem distances in meters
pub const STANDARD_GEM_DISTANCES: &[f64] = &[
    100.0, 200.0, 400.0, 800.0, 1000.0, 1609.34, 3000.0, 5000.0, 10000.0, 21097.5, 42195.0,
];

/// A single point on a gem curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Requested distance in meters
    pub distance: f64,
    /// Best section, `None` if the track is too short or nothing qualified
    pub section: Option<Section>,
}

/// Result of gem curve computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemCurve {
    pub objective: Objective,
    /// One point per requested distance, in request order
    pub points: Vec<CurvePoint>,
}

impl GemCurve {
    /// Get the best section at a specific distance
    pub fn section_at(&self, distance: f64) -> Option<&Section> {
        self.points
            .iter()
            .find(|p| (p.distance - distance).abs() < 1e-6)
            .and_then(|p| p.section.as_ref())
    }

    /// Get the best metric (m/s or meters) at a specific distance
    pub fn metric_at(&self, distance: f64) -> Option<f64> {
        self.section_at(distance).map(|s| s.metric)
    }

    /// Longest distance for which a section was found
    pub fn longest_found(&self) -> Option<f64> {
        self.points
            .iter()
            .filter(|p| p.section.is_some())
            .map(|p| p.distance)
            .reduce(f64::max)
    }
}

/// Compute the fastest section for every distance.
///
/// Distances longer than the track produce empty points. Errors about the
/// shape of the input (`InconsistentLength`, `TooFewDataPoints`) or an
/// invalid distance abort the whole curve.
pub fn compute_velocity_curve(
    times: &[f64],
    coordinates: &[GpsPoint],
    distances: &[f64],
) -> Result<GemCurve, SearchError> {
    let points = evaluate(distances, |distance| {
        find_fastest_section(distance, times, coordinates)
    })?;
    Ok(finish(Objective::Velocity, points))
}

/// Compute the best climb for every distance.
///
/// Same rules as [`compute_velocity_curve`]; distances where no window gains
/// altitude produce empty points.
pub fn compute_climb_curve(
    times: &[f64],
    coordinates: &[GpsPoint],
    altitudes: &[f64],
    distances: &[f64],
) -> Result<GemCurve, SearchError> {
    let points = evaluate(distances, |distance| {
        find_best_climb_section(distance, times, coordinates, altitudes)
    })?;
    Ok(finish(Objective::Climb, points))
}

fn evaluate<F>(distances: &[f64], search: F) -> Result<Vec<CurvePoint>, SearchError>
where
    F: Fn(f64) -> Result<Section, SearchError> + Sync,
{
    #[cfg(feature = "parallel")]
    let iter = distances.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = distances.iter();

    iter.map(|&distance| {
        let section = match search(distance) {
            Ok(section) if section.valid => Some(section),
            Ok(_) | Err(SearchError::DistanceTooSmall) | Err(SearchError::NoSectionFound) => None,
            Err(e) => return Err(e),
        };
        Ok(CurvePoint { distance, section })
    })
    .collect()
}

fn finish(objective: Objective, points: Vec<CurvePoint>) -> GemCurve {
    let curve = GemCurve { objective, points };
    debug!(
        "[Curves] {} curve: {} distances, longest found {:?}",
        objective,
        curve.points.len(),
        curve.longest_found()
    );
    curve
}
