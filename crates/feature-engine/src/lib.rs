//! Feature Engineering Engine
//!
//! Derives the instantaneous model features of a single charge/discharge cycle
//! from raw, irregularly sampled voltage/current readings.

mod features;
mod interpolation;
mod slope;

pub use features::{
    CycleFeatures, FeatureExtractor, FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES,
    MIN_CYCLE_SAMPLES,
};
pub use interpolation::TimeSeries;
pub use slope::{window_slope, MIN_WINDOW_POINTS};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single raw reading reported by a device during a cycle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// Offset from the start of the cycle (ms)
    pub time_ms: f64,
    /// Terminal voltage (V)
    pub voltage: f64,
    /// Measured current (A), not every device reports it
    pub current: Option<f64>,
}

impl Sample {
    /// Create a sample without a current reading
    pub fn new(time_ms: f64, voltage: f64) -> Self {
        Self {
            time_ms,
            voltage,
            current: None,
        }
    }

    /// Offset in seconds
    pub fn time_s(&self) -> f64 {
        self.time_ms / 1000.0
    }
}

/// Errors during feature extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("too few samples: need at least {required}, got {actual}")]
    TooFewSamples { required: usize, actual: usize },

    #[error("too few points in the {lo}-{hi} s window: need at least {required}, got {actual}")]
    InsufficientData {
        lo: f64,
        hi: f64,
        required: usize,
        actual: usize,
    },

    #[error("voltage slope is zero in the {lo}-{hi} s window, f3 is undefined")]
    FlatVoltage { lo: f64, hi: f64 },

    #[error("{0} is not a finite number")]
    NonFinite(&'static str),
}
