//! Windowed Least-Squares Slope

use crate::{FeatureError, Sample};

/// Minimum number of samples inside the window for a slope estimate
pub const MIN_WINDOW_POINTS: usize = 5;

/// Guard for windows whose timestamps are (nearly) identical
const VARIANCE_FLOOR: f64 = 1e-12;

/// Ordinary least-squares slope of voltage over time (V/s) for the samples
/// falling inside `[lo_s, hi_s]` seconds, bounds inclusive.
pub fn window_slope(samples: &[Sample], lo_s: f64, hi_s: f64) -> Result<f64, FeatureError> {
    let points: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.time_s(), s.voltage))
        .filter(|&(t, _)| lo_s <= t && t <= hi_s)
        .collect();

    if points.len() < MIN_WINDOW_POINTS {
        return Err(FeatureError::InsufficientData {
            lo: lo_s,
            hi: hi_s,
            required: MIN_WINDOW_POINTS,
            actual: points.len(),
        });
    }

    let n = points.len() as f64;
    let t_mean = points.iter().map(|p| p.0).sum::<f64>() / n;
    let v_mean = points.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for &(t, v) in &points {
        let dt = t - t_mean;
        sxy += dt * (v - v_mean);
        sxx += dt * dt;
    }

    Ok(sxy / sxx.max(VARIANCE_FLOOR))
}
