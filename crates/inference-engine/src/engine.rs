//! Inference Engine Implementation

use crate::regressor::{LinearRegressor, OnnxRegressor, Regressor};
use crate::InferenceError;
use feature_engine::{FeatureVector, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Candidate model artifacts, tried in order at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSelection {
    /// Best estimator from the grid search
    pub preferred: PathBuf,
    /// Fixed-hyperparameter estimator
    pub fallback: PathBuf,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            preferred: PathBuf::from("ann_grid.onnx"),
            fallback: PathBuf::from("ann_fixed.onnx"),
        }
    }
}

/// Result of a prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted cycle life (cycles)
    pub cycle_life: f64,
    /// Features the prediction was made from, in model order
    pub features: FeatureVector,
    /// Inference latency in milliseconds
    pub latency_ms: u64,
}

/// Prediction gateway in front of the loaded regressor
pub struct InferenceEngine {
    /// Artifact the model was loaded from
    model_file: String,
    model: Box<dyn Regressor>,
}

impl InferenceEngine {
    /// Wrap an already loaded regressor
    pub fn new(model_file: impl Into<String>, model: Box<dyn Regressor>) -> Self {
        let model_file = model_file.into();
        info!("Creating inference engine with model: {}", model_file);
        Self { model_file, model }
    }

    /// Load the preferred artifact, falling back to the second one.
    ///
    /// Fails when neither can be loaded; the service must not start without a model.
    pub fn load(selection: &ModelSelection) -> Result<Self, InferenceError> {
        let mut failures = Vec::new();

        for path in [&selection.preferred, &selection.fallback] {
            if !path.exists() {
                debug!("Model artifact {} not present", path.display());
                failures.push(format!("{}: not found", path.display()));
                continue;
            }
            match OnnxRegressor::load(path) {
                Ok(model) => {
                    info!("Model loaded successfully from {}", path.display());
                    return Ok(Self::new(path.display().to_string(), Box::new(model)));
                }
                Err(e) => {
                    warn!("{}", e);
                    failures.push(e.to_string());
                }
            }
        }

        Err(InferenceError::NoModel(failures.join("; ")))
    }

    /// Create a mock inference engine backed by a fixed linear model
    pub fn mock() -> Self {
        Self::new(
            "mock",
            Box::new(LinearRegressor {
                weights: [-400.0, -600.0, 2.0, 5.0, 150.0],
                intercept: 1200.0,
            }),
        )
    }

    /// Run inference on an ordered feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        let start = Instant::now();

        let cycle_life = self.model.predict(features)?;
        if !cycle_life.is_finite() {
            return Err(InferenceError::NonFiniteOutput(cycle_life));
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!("Inference completed in {}ms: cycle_life={:.2}", latency_ms, cycle_life);

        Ok(PredictionResult {
            cycle_life,
            features: *features,
            latency_ms,
        })
    }

    /// Get model file
    pub fn model_file(&self) -> &str {
        &self.model_file
    }

    /// Feature names in the order the model expects
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `x · [0.5, -1, 2, 0.25, 1.5] + 100` as a MatMul + Add graph
    fn linear_fixture() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/linear.onnx"))
    }

    struct Constant(f64);

    impl Regressor for Constant {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, InferenceError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_mock_prediction_is_deterministic() {
        let engine = InferenceEngine::mock();
        let features = FeatureVector::new([1.0; 5]);

        let first = engine.predict(&features).unwrap();
        let second = engine.predict(&features).unwrap();
        assert_eq!(first.cycle_life, second.cycle_life);
        assert_eq!(first.features, features);
        assert_eq!(engine.model_file(), "mock");
    }

    #[test]
    fn test_non_finite_output_rejected() {
        let engine = InferenceEngine::new("nan.onnx", Box::new(Constant(f64::NAN)));
        let err = engine.predict(&FeatureVector::default()).unwrap_err();
        assert!(matches!(err, InferenceError::NonFiniteOutput(_)));
    }

    #[test]
    fn test_load_fails_without_artifacts() {
        let selection = ModelSelection {
            preferred: PathBuf::from("/nonexistent/ann_grid.onnx"),
            fallback: PathBuf::from("/nonexistent/ann_fixed.onnx"),
        };
        let err = InferenceEngine::load(&selection).err().unwrap();
        let message = err.to_string();
        assert!(message.contains("ann_grid.onnx: not found"));
        assert!(message.contains("ann_fixed.onnx: not found"));
    }

    #[test]
    fn test_corrupt_preferred_tries_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let preferred = dir.path().join("ann_grid.onnx");
        std::fs::write(&preferred, b"garbage").unwrap();

        let selection = ModelSelection {
            preferred,
            fallback: dir.path().join("ann_fixed.onnx"),
        };
        let message = InferenceEngine::load(&selection).err().unwrap().to_string();
        assert!(message.contains("Could not load model file"));
        assert!(message.contains("ann_fixed.onnx: not found"));
    }

    #[test]
    fn test_loads_preferred_onnx_artifact() {
        let selection = ModelSelection {
            preferred: linear_fixture(),
            fallback: PathBuf::from("/nonexistent/ann_fixed.onnx"),
        };
        let engine = InferenceEngine::load(&selection).unwrap();
        assert!(engine.model_file().ends_with("linear.onnx"));

        let features = FeatureVector::new([1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = engine.predict(&features).unwrap();
        assert!((result.cycle_life - 113.0).abs() < 1e-4);
        assert_eq!(result.features, features);
    }

    #[test]
    fn test_missing_preferred_uses_fallback_artifact() {
        let selection = ModelSelection {
            preferred: PathBuf::from("/nonexistent/ann_grid.onnx"),
            fallback: linear_fixture(),
        };
        let engine = InferenceEngine::load(&selection).unwrap();
        assert!(engine.model_file().ends_with("linear.onnx"));

        let result = engine.predict(&FeatureVector::new([1.0; 5])).unwrap();
        assert!((result.cycle_life - 103.25).abs() < 1e-4);
    }

    #[test]
    fn test_feature_order() {
        let engine = InferenceEngine::mock();
        assert_eq!(engine.feature_names(), &["f1", "f2", "f3", "f4", "f5"]);
    }
}
