//! Two-pointer scan over candidate windows.

/// Iterator over the tightest window ending at each index.
///
/// For every end index `e` it yields `(s, e)` where `s` is the largest start
/// with `distances[e] - distances[s] >= desired_distance`. The start cursor
/// only moves forward, so a full pass is linear in the number of samples.
/// End indices without any qualifying start are skipped.
pub struct CandidateWindows<'a> {
    distances: &'a [f64],
    desired_distance: f64,
    start: usize,
    end: usize,
}

impl<'a> CandidateWindows<'a> {
    /// `distances` must be a non-decreasing prefix-distance array and
    /// `desired_distance` strictly positive.
    pub fn new(distances: &'a [f64], desired_distance: f64) -> Self {
        Self {
            distances,
            desired_distance,
            start: 0,
            end: 1,
        }
    }

    fn covered(&self, start: usize, end: usize) -> f64 {
        self.distances[end] - self.distances[start]
    }
}

impl Iterator for CandidateWindows<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.end < self.distances.len() {
            let end = self.end;
            self.end += 1;

            while self.start + 1 < end
                && self.covered(self.start + 1, end) >= self.desired_distance
            {
                self.start += 1;
            }
            if self.covered(self.start, end) >= self.desired_distance {
                return Some((self.start, end));
            }
        }
        None
    }
}

/// Best window found by [`best_window`], in compacted indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    pub metric: f64,
}

/// Evaluate `metric` on every candidate window and keep the maximum.
///
/// Ties keep the first window encountered (smallest end index).
pub fn best_window(
    distances: &[f64],
    desired_distance: f64,
    metric: impl Fn(usize, usize) -> f64,
) -> Option<Window> {
    let mut best: Option<Window> = None;
    for (start, end) in CandidateWindows::new(distances, desired_distance) {
        let value = metric(start, end);
        if best.map_or(true, |b| value > b.metric) {
            best = Some(Window {
                start,
                end,
                metric: value,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tightest_windows() {
        let distances = [0.0, 10.0, 20.0, 30.0, 40.0];
        let windows: Vec<_> = CandidateWindows::new(&distances, 20.0).collect();
        assert_eq!(windows, vec![(0, 2), (1, 3), (2, 4)]);
    }

    #[test]
    fn test_skips_ends_without_start() {
        // ends 1 and 2 have no start; the start jumps from 0 to 1 at end 3
        let distances = [0.0, 5.0, 6.0, 30.0, 31.0];
        let windows: Vec<_> = CandidateWindows::new(&distances, 25.0).collect();
        assert_eq!(windows, vec![(1, 3), (2, 4)]);

        // the start skips several samples at once
        let distances = [0.0, 1.0, 2.0, 3.0, 40.0];
        let windows: Vec<_> = CandidateWindows::new(&distances, 30.0).collect();
        assert_eq!(windows, vec![(3, 4)]);
    }

    #[test]
    fn test_start_cursor_never_decreases() {
        // irregular steps including zero-length ones
        let steps = [3.0, 0.0, 7.0, 1.0, 0.0, 0.0, 12.0, 2.0, 9.0, 0.5, 4.0, 20.0, 1.0];
        let mut distances = vec![0.0];
        let mut total = 0.0;
        for step in steps {
            total += step;
            distances.push(total);
        }

        for desired in [0.5, 1.0, 5.0, 13.0, 30.0, 59.5] {
            let windows: Vec<_> = CandidateWindows::new(&distances, desired).collect();
            assert!(!windows.is_empty());
            for pair in windows.windows(2) {
                assert!(pair[1].0 >= pair[0].0, "start moved back for {}", desired);
                assert!(pair[1].1 > pair[0].1);
            }
            for &(s, e) in &windows {
                assert!(distances[e] - distances[s] >= desired);
                // tightest: moving the start one step right breaks the floor
                assert!(s + 1 == e || distances[e] - distances[s + 1] < desired);
            }
        }
    }

    #[test]
    fn test_no_candidates() {
        let distances = [0.0, 1.0, 2.0];
        assert_eq!(CandidateWindows::new(&distances, 5.0).count(), 0);
        assert_eq!(best_window(&distances, 5.0, |_, _| 1.0), None);
        assert_eq!(CandidateWindows::new(&[0.0], 1.0).count(), 0);
    }

    #[test]
    fn test_best_window_ties_keep_first() {
        let distances = [0.0, 10.0, 20.0, 30.0];
        let best = best_window(&distances, 10.0, |_, _| 1.0).unwrap();
        assert_eq!((best.start, best.end), (0, 1));

        let best = best_window(&distances, 10.0, |s, _| s as f64).unwrap();
        assert_eq!((best.start, best.end, best.metric), (2, 3, 2.0));
    }
}
