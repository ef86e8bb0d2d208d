//! Compaction of the sample stream to mutually valid samples.

use crate::error::SearchError;
use crate::geo_utils::{haversine_distance, is_missing_coordinate, is_missing_scalar};
use crate::GpsPoint;

/// Samples that are valid in every sequence the objective needs.
///
/// `indices` maps each compacted position back to the caller's input index;
/// it is built once per search.
#[derive(Debug, Clone)]
pub struct CompactedSamples {
    pub indices: Vec<usize>,
    pub times: Vec<f64>,
    pub altitudes: Vec<f64>,
    /// Prefix distance in meters, `distances[0] == 0`, non-decreasing
    pub distances: Vec<f64>,
}

impl CompactedSamples {
    /// Compact the input. Lengths must already be checked by the caller.
    ///
    /// Fails with [`SearchError::TooFewDataPoints`] if fewer than two samples
    /// survive.
    pub fn new(
        times: &[f64],
        coordinates: &[GpsPoint],
        altitudes: Option<&[f64]>,
    ) -> Result<Self, SearchError> {
        let indices: Vec<usize> = (0..times.len())
            .filter(|&i| {
                !is_missing_scalar(times[i])
                    && !is_missing_coordinate(&coordinates[i])
                    && altitudes.map_or(true, |alts| !is_missing_scalar(alts[i]))
            })
            .collect();

        if indices.len() < 2 {
            return Err(SearchError::TooFewDataPoints);
        }

        let mut distances = Vec::with_capacity(indices.len());
        distances.push(0.0);
        for pair in indices.windows(2) {
            let step = haversine_distance(&coordinates[pair[0]], &coordinates[pair[1]]);
            let previous = distances.last().copied().unwrap_or(0.0);
            distances.push(previous + step);
        }

        Ok(Self {
            times: indices.iter().map(|&i| times[i]).collect(),
            altitudes: altitudes
                .map(|alts| indices.iter().map(|&i| alts[i]).collect())
                .unwrap_or_default(),
            indices,
            distances,
        })
    }

    /// Number of surviving samples, at least two.
    pub(crate) fn len(&self) -> usize {
        self.indices.len()
    }

    /// Distance covered by all valid samples.
    pub fn total_distance(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Fail with [`SearchError::DistanceTooSmall`] if the track is too short.
    pub fn ensure_distance(&self, desired_distance: f64) -> Result<(), SearchError> {
        if self.total_distance() < desired_distance {
            return Err(SearchError::DistanceTooSmall);
        }
        Ok(())
    }

    /// Prefix sums of positive altitude steps (descents count as zero).
    pub fn cumulative_climb(&self) -> Vec<f64> {
        let mut climb = Vec::with_capacity(self.altitudes.len());
        let mut total = 0.0;
        for (i, &altitude) in self.altitudes.iter().enumerate() {
            if i > 0 {
                total += (altitude - self.altitudes[i - 1]).max(0.0);
            }
            climb.push(total);
        }
        climb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<GpsPoint> {
        (0..n).map(|i| GpsPoint::new(48.0, 8.0 + i as f64 * 0.001)).collect()
    }

    #[test]
    fn test_compaction_keeps_index_map() {
        let mut coords = line(5);
        coords[1] = GpsPoint::new(f64::NAN, 8.001);
        let times = vec![0.0, 1.0, f64::NAN, 3.0, 4.0];

        let samples = CompactedSamples::new(&times, &coords, None).unwrap();
        assert_eq!(samples.indices, vec![0, 3, 4]);
        assert_eq!(samples.times, vec![0.0, 3.0, 4.0]);
        assert!(samples.altitudes.is_empty());
        assert_eq!(samples.distances[0], 0.0);
        let expected = haversine_distance(&coords[0], &coords[3]);
        assert!((samples.distances[1] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_altitudes_take_part_in_validity() {
        let coords = line(4);
        let times = vec![0.0, 1.0, 2.0, 3.0];
        let alts = vec![10.0, f64::NAN, 12.0, 11.0];

        let samples = CompactedSamples::new(&times, &coords, Some(&alts)).unwrap();
        assert_eq!(samples.indices, vec![0, 2, 3]);
        assert_eq!(samples.altitudes, vec![10.0, 12.0, 11.0]);
        assert_eq!(samples.cumulative_climb(), vec![0.0, 2.0, 2.0]);
    }

    #[test]
    fn test_distances_non_decreasing() {
        let coords = vec![
            GpsPoint::new(48.0, 8.0),
            GpsPoint::new(48.0, 8.0),
            GpsPoint::new(48.001, 8.0),
            GpsPoint::new(48.0, 8.0),
        ];
        let samples = CompactedSamples::new(&[0.0; 4], &coords, None).unwrap();
        assert!(samples.distances.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(samples.distances[1], 0.0);
    }

    #[test]
    fn test_too_few_valid_samples() {
        let coords = vec![GpsPoint::new(f64::NAN, 1.0), GpsPoint::new(10.2, 40.3)];
        assert_eq!(
            CompactedSamples::new(&[1.0, 2.0], &coords, None).unwrap_err(),
            SearchError::TooFewDataPoints
        );
        assert_eq!(
            CompactedSamples::new(&[], &[], None).unwrap_err(),
            SearchError::TooFewDataPoints
        );
    }

    #[test]
    fn test_ensure_distance() {
        let samples = CompactedSamples::new(&[0.0, 1.0], &line(2), None).unwrap();
        let total = samples.total_distance();
        assert!(samples.ensure_distance(total).is_ok());
        assert_eq!(
            samples.ensure_distance(total + 1.0),
            Err(SearchError::DistanceTooSmall)
        );
    }
}
