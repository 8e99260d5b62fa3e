//! Linear Interpolation over Irregular Time Series

use crate::Sample;

/// Non-empty cycle samples sorted by time offset
#[derive(Debug, Clone)]
pub struct TimeSeries {
    samples: Vec<Sample>,
}

impl TimeSeries {
    /// Sort samples by time (stable, ties keep arrival order).
    ///
    /// Returns `None` for an empty input.
    pub fn new(mut samples: Vec<Sample>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        samples.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        Some(Self { samples })
    }

    /// Sorted samples
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Voltage at `t_s` seconds into the cycle.
    ///
    /// The first consecutive pair bracketing `t_s` (inclusive on both ends) is
    /// interpolated linearly. Past the last sample the last voltage is held;
    /// before the first sample the first pair is extended backwards.
    pub fn value_at(&self, t_s: f64) -> f64 {
        let t_ms = t_s * 1000.0;
        let first = &self.samples[0];

        if t_ms < first.time_ms {
            return match self.samples.get(1) {
                Some(second) => lerp(first, second, t_ms),
                None => first.voltage,
            };
        }

        for pair in self.samples.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.time_ms <= t_ms && t_ms <= b.time_ms {
                return lerp(a, b, t_ms);
            }
        }

        self.samples[self.samples.len() - 1].voltage
    }
}

fn lerp(a: &Sample, b: &Sample, t_ms: f64) -> f64 {
    // zero-length bracket resolves to the earlier sample
    let w = if b.time_ms > a.time_ms {
        (t_ms - a.time_ms) / (b.time_ms - a.time_ms)
    } else {
        0.0
    };
    a.voltage + w * (b.voltage - a.voltage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn series(points: &[(f64, f64)]) -> TimeSeries {
        TimeSeries::new(points.iter().map(|&(t, v)| Sample::new(t, v)).collect()).unwrap()
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(TimeSeries::new(Vec::new()).is_none());
    }

    #[test]
    fn test_sorts_unordered_input() {
        let s = series(&[(2000.0, 2.0), (0.0, 3.0), (1000.0, 2.5)]);
        let times: Vec<f64> = s.samples().iter().map(|p| p.time_ms).collect();
        assert_eq!(times, vec![0.0, 1000.0, 2000.0]);
    }

    #[test]
    fn test_exact_sample_hit() {
        let s = series(&[(0.0, 2.8), (1000.0, 2.7), (2000.0, 2.5)]);
        assert_eq!(s.value_at(1.0), 2.7);
        assert_eq!(s.value_at(0.0), 2.8);
    }

    #[test]
    fn test_holds_last_value_past_end() {
        let s = series(&[(0.0, 2.8), (1000.0, 2.7), (2000.0, 2.5)]);
        assert_eq!(s.value_at(10.0), 2.5);
        assert_eq!(s.value_at(1e6), 2.5);
    }

    #[test]
    fn test_extends_first_pair_before_start() {
        let s = series(&[(1000.0, 2.0), (2000.0, 1.0), (3000.0, 0.5)]);
        // slope of first pair is -1 V/s
        assert!((s.value_at(0.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample() {
        let s = series(&[(500.0, 1.5)]);
        assert_eq!(s.value_at(0.0), 1.5);
        assert_eq!(s.value_at(100.0), 1.5);
    }

    #[test]
    fn test_duplicate_times_pick_first_pair() {
        let s = series(&[(0.0, 3.0), (1000.0, 2.0), (1000.0, 1.0), (2000.0, 0.0)]);
        // (0, 1000] brackets t = 1 s first, w = 1
        assert_eq!(s.value_at(1.0), 2.0);

        let degenerate = series(&[(1000.0, 2.0), (1000.0, 3.0)]);
        assert_eq!(degenerate.value_at(1.0), 2.0);
    }

    proptest! {
        #[test]
        fn prop_midpoint_is_average(
            t0 in 0.0f64..50_000.0,
            dt in 1.0f64..10_000.0,
            v0 in -5.0f64..5.0,
            v1 in -5.0f64..5.0,
        ) {
            let t1 = t0 + dt;
            let s = series(&[(t0, v0), (t1, v1)]);
            let mid = s.value_at((t0 + t1) / 2.0 / 1000.0);
            prop_assert!((mid - (v0 + v1) / 2.0).abs() < 1e-9);
            prop_assert!((s.value_at(t0 / 1000.0) - v0).abs() < 1e-9);
            prop_assert_eq!(s.value_at(t1 / 1000.0 + 1.0), v1);
        }
    }
}
