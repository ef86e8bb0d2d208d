//! Optimal-window search over a recorded track.
//!
//! Given parallel time, coordinate and (for climbs) altitude sequences, find
//! the contiguous window covering at least a desired distance that maximizes
//! either average velocity or cumulative elevation gain.
//!
//! ## Algorithm
//! 1. Validate the inputs (lengths, desired distance).
//! 2. Compact to the samples that are valid in every sequence the objective
//!    needs, keeping a map back to input indices.
//! 3. Build the prefix distance array over the compacted samples.
//! 4. Scan the tightest window ending at every sample with two cursors and
//!    keep the best metric.
//!
//! The scan is linear in the number of samples. Reported indices always refer
//! to the caller's input, so missing samples never shift them.

mod samples;
mod window;

pub use samples::CompactedSamples;
pub use window::{best_window, CandidateWindows, Window};

use std::ops::RangeInclusive;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::GpsPoint;

/// What a search maximizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Average velocity in m/s
    Velocity,
    /// Cumulative positive elevation change in meters
    Climb,
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Objective::Velocity => write!(f, "velocity"),
            Objective::Climb => write!(f, "climb"),
        }
    }
}

/// Best window found by a search.
///
/// `start` and `end` are inclusive indices into the caller's input. When
/// `valid` is false nothing was found and the other fields are zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub start: usize,
    pub end: usize,
    /// m/s for velocity searches, meters for climb searches
    pub metric: f64,
    pub valid: bool,
}

impl Section {
    pub fn new(start: usize, end: usize, metric: f64) -> Self {
        Self {
            start,
            end,
            metric,
            valid: true,
        }
    }

    /// The "nothing found" result.
    pub fn not_found() -> Self {
        Self {
            start: 0,
            end: 0,
            metric: 0.0,
            valid: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Input indices covered by the window.
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Number of index steps between start and end.
    pub fn span(&self) -> usize {
        self.end - self.start
    }

    /// Number of input samples in the window, 0 when nothing was found.
    pub fn len(&self) -> usize {
        if self.valid {
            self.span() + 1
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Average velocity in m/s of a section from [`find_fastest_section`].
    pub fn velocity(&self) -> Option<f64> {
        self.valid.then_some(self.metric)
    }

    /// Climb in meters of a section from [`find_best_climb_section`].
    pub fn climb(&self) -> Option<f64> {
        self.valid.then_some(self.metric)
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::not_found()
    }
}

/// Find the window of at least `desired_distance` meters with the highest
/// average velocity.
///
/// A sample is skipped if its time or either coordinate component is NaN.
/// Windows with a non-positive duration score zero; if every candidate scores
/// zero the result is [`Section::not_found`] rather than an error.
///
/// # Example
/// ```
/// use sportgems::{find_fastest_section, GpsPoint};
///
/// let coords: Vec<GpsPoint> = (0..4)
///     .map(|i| GpsPoint::new(48.123, 9.35 + i as f64 * 0.01))
///     .collect();
/// let times = vec![0.0, 10.0, 20.0, 30.0];
///
/// let section = find_fastest_section(1000.0, &times, &coords).unwrap();
/// assert!(section.valid);
/// assert_eq!(section.span(), 2);
/// ```
pub fn find_fastest_section(
    desired_distance: f64,
    times: &[f64],
    coordinates: &[GpsPoint],
) -> Result<Section, SearchError> {
    if times.len() != coordinates.len() {
        return Err(SearchError::InconsistentLength);
    }
    check_desired_distance(desired_distance)?;

    let samples = CompactedSamples::new(times, coordinates, None)?;
    log_compaction(Objective::Velocity, times.len(), &samples);
    samples.ensure_distance(desired_distance)?;

    let best = best_window(&samples.distances, desired_distance, |s, e| {
        average_velocity(
            samples.distances[e] - samples.distances[s],
            samples.times[e] - samples.times[s],
        )
    });

    match best {
        Some(window) if window.metric > 0.0 => {
            Ok(to_section(Objective::Velocity, &samples, window))
        }
        _ => {
            info!(
                "[Search] No window over {:.0}m has a positive duration",
                desired_distance
            );
            Ok(Section::not_found())
        }
    }
}

/// Find the window of at least `desired_distance` meters with the largest
/// cumulative climb.
///
/// Only positive altitude steps count; descents inside the window do not
/// reduce the result. A sample is skipped if its time, either coordinate
/// component or its altitude is NaN. Fails with
/// [`SearchError::NoSectionFound`] if no qualifying window gains altitude.
pub fn find_best_climb_section(
    desired_distance: f64,
    times: &[f64],
    coordinates: &[GpsPoint],
    altitudes: &[f64],
) -> Result<Section, SearchError> {
    if times.len() != coordinates.len() || times.len() != altitudes.len() {
        return Err(SearchError::InconsistentLength);
    }
    check_desired_distance(desired_distance)?;

    let samples = CompactedSamples::new(times, coordinates, Some(altitudes))?;
    log_compaction(Objective::Climb, times.len(), &samples);
    samples.ensure_distance(desired_distance)?;

    let climb = samples.cumulative_climb();
    let best = best_window(&samples.distances, desired_distance, |s, e| {
        climb[e] - climb[s]
    });

    match best {
        Some(window) if window.metric > 0.0 => Ok(to_section(Objective::Climb, &samples, window)),
        _ => Err(SearchError::NoSectionFound),
    }
}

fn check_desired_distance(desired_distance: f64) -> Result<(), SearchError> {
    // NaN fails this comparison too
    if !(desired_distance > 0.0) {
        return Err(SearchError::InvalidDesiredDistance);
    }
    Ok(())
}

fn average_velocity(distance: f64, duration: f64) -> f64 {
    if !(duration > 0.0) {
        return 0.0;
    }
    let velocity = distance / duration;
    if velocity.is_finite() {
        velocity
    } else {
        0.0
    }
}

fn log_compaction(objective: Objective, input_len: usize, samples: &CompactedSamples) {
    debug!(
        "[Search] {}: {} of {} samples valid, {:.1}m total",
        objective,
        samples.len(),
        input_len,
        samples.total_distance()
    );
}

fn to_section(objective: Objective, samples: &CompactedSamples, window: Window) -> Section {
    let section = Section::new(
        samples.indices[window.start],
        samples.indices[window.end],
        window.metric,
    );
    info!(
        "[Search] Best {} window: {}..={} ({:.3})",
        objective, section.start, section.end, section.metric
    );
    section
}
