//! Altitude cleanup for barometric and GPS altitude streams.

use log::debug;

/// Largest accepted jump between consecutive altitudes, relative to the
/// previous accepted altitude (10.0 = 1000 %).
pub const MAX_RELATIVE_ALTITUDE_JUMP: f64 = 10.0;

/// Replace altitude spikes with NaN.
///
/// Each finite altitude is compared against the last accepted one; if the
/// jump exceeds `max_relative_jump` times the magnitude of the accepted value
/// (at least 1 m) it is dropped. Dropped and NaN samples keep their position,
/// so indices into the output match the input.
///
/// # Example
/// ```
/// use sportgems::altitude::remove_outliers;
///
/// let cleaned = remove_outliers(&[400.0, 402.0, 9000.0, 404.0], 10.0);
/// assert_eq!(cleaned[1], 402.0);
/// assert!(cleaned[2].is_nan());
/// assert_eq!(cleaned[3], 404.0);
/// ```
pub fn remove_outliers(altitudes: &[f64], max_relative_jump: f64) -> Vec<f64> {
    let mut accepted: Option<f64> = None;
    let mut removed = 0;

    let cleaned = altitudes
        .iter()
        .map(|&altitude| {
            if !altitude.is_finite() {
                return f64::NAN;
            }
            match accepted {
                Some(prev) if (altitude - prev).abs() > max_relative_jump * prev.abs().max(1.0) => {
                    removed += 1;
                    f64::NAN
                }
                _ => {
                    accepted = Some(altitude);
                    altitude
                }
            }
        })
        .collect();

    if removed > 0 {
        debug!("[Altitude] Removed {} outliers", removed);
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_profile_unchanged() {
        let alts = vec![244.0, 245.0, 247.0, 246.0, 230.0];
        assert_eq!(remove_outliers(&alts, MAX_RELATIVE_ALTITUDE_JUMP), alts);
    }

    #[test]
    fn test_spike_removed_against_last_accepted() {
        let cleaned = remove_outliers(&[100.0, 5000.0, 6000.0, 101.0], 10.0);
        assert_eq!(cleaned[0], 100.0);
        assert!(cleaned[1].is_nan());
        assert!(cleaned[2].is_nan());
        assert_eq!(cleaned[3], 101.0);
    }

    #[test]
    fn test_near_zero_and_negative_altitudes() {
        // sea level: small absolute moves are fine
        let cleaned = remove_outliers(&[0.0, 3.0, -2.0, 50.0], 10.0);
        assert_eq!(&cleaned[..3], &[0.0, 3.0, -2.0]);
        assert!(cleaned[3].is_nan());

        let dead_sea = vec![-430.0, -428.0, -425.0];
        assert_eq!(remove_outliers(&dead_sea, 10.0), dead_sea);
    }

    #[test]
    fn test_missing_values_stay_missing() {
        let cleaned = remove_outliers(&[f64::NAN, 300.0, f64::NAN, 301.0], 10.0);
        assert!(cleaned[0].is_nan());
        assert_eq!(cleaned[1], 300.0);
        assert!(cleaned[2].is_nan());
        assert_eq!(cleaned[3], 301.0);
        assert!(remove_outliers(&[], 10.0).is_empty());
    }
}
