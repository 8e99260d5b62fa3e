//! ONNX Inference Engine
//!
//! Loads the trained cycle-life regressor and runs it on ordered feature
//! vectors.

mod engine;
mod regressor;

pub use engine::{InferenceEngine, ModelSelection, PredictionResult};
pub use regressor::{LinearRegressor, OnnxRegressor, Regressor};

use thiserror::Error;

/// Errors during model loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Could not load model file {path}: {reason}")]
    ModelLoadError { path: String, reason: String },
    #[error("No usable model artifact ({0})")]
    NoModel(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Model returned a non-finite prediction: {0}")]
    NonFiniteOutput(f64),
}
