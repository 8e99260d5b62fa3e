//! Cycle Feature Extraction and Feature Vector Assembly

use crate::interpolation::TimeSeries;
use crate::slope::window_slope;
use crate::{FeatureError, Sample};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features consumed by the model
pub const FEATURE_DIMENSION: usize = 5;

/// Feature names in the order the model was trained on
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = ["f1", "f2", "f3", "f4", "f5"];

/// Minimum number of raw samples in a cycle
pub const MIN_CYCLE_SAMPLES: usize = 10;

/// Instantaneous features of a single cycle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CycleFeatures {
    /// Voltage drop over 0-10 s
    pub f1: f64,
    /// Voltage drop over 10-20 s
    pub f2: f64,
    /// Commanded current over |dV/dt| in the 5-25 s window
    pub f3: f64,
}

/// Ordered feature vector for ML inference
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Values in `FEATURE_NAMES` order
    pub values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    /// Wrap already ordered values
    pub fn new(values: [f64; FEATURE_DIMENSION]) -> Self {
        Self { values }
    }

    /// Assemble `[f1, f2, f3, a, b]` from cycle features and the device's power-law fit
    pub fn from_cycle(cycle: &CycleFeatures, a: f64, b: f64) -> Self {
        Self::new([cycle.f1, cycle.f2, cycle.f3, a, b])
    }

    /// Values as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Extracts cycle features from raw samples
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    /// Instants (s) at which voltage is sampled for f1/f2
    instants: [f64; 3],
    /// Slope window (s), inclusive
    slope_window: (f64, f64),
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            instants: [0.0, 10.0, 20.0],
            slope_window: (5.0, 25.0),
        }
    }
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract `(f1, f2, f3)` from one cycle's samples, in any order.
    pub fn extract(
        &self,
        samples: &[Sample],
        commanded_current: f64,
    ) -> Result<CycleFeatures, FeatureError> {
        if samples.len() < MIN_CYCLE_SAMPLES {
            return Err(FeatureError::TooFewSamples {
                required: MIN_CYCLE_SAMPLES,
                actual: samples.len(),
            });
        }
        if !commanded_current.is_finite() {
            return Err(FeatureError::NonFinite("commanded current"));
        }

        let series = TimeSeries::new(samples.to_vec()).ok_or(FeatureError::TooFewSamples {
            required: MIN_CYCLE_SAMPLES,
            actual: 0,
        })?;

        let [t0, t1, t2] = self.instants;
        let v0 = series.value_at(t0);
        let v10 = series.value_at(t1);
        let v20 = series.value_at(t2);

        let (lo, hi) = self.slope_window;
        let slope = window_slope(series.samples(), lo, hi)?;
        if slope == 0.0 {
            return Err(FeatureError::FlatVoltage { lo, hi });
        }

        let f3 = commanded_current / slope.abs();
        if !f3.is_finite() {
            return Err(FeatureError::NonFinite("f3"));
        }

        debug!(
            "Extracted cycle features: V0={:.4}, V10={:.4}, V20={:.4}, slope={:.6} V/s, f3={:.4}",
            v0, v10, v20, slope, f3
        );

        Ok(CycleFeatures {
            f1: v0 - v10,
            f2: v10 - v20,
            f3,
        })
    }
}
