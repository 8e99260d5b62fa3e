//! Regression Model Backends

use crate::InferenceError;
use feature_engine::{FeatureVector, FEATURE_DIMENSION};
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

/// A trained model mapping an ordered feature vector to a scalar
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError>;
}

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX export of the trained pipeline (scaler + MLP), run with tract
pub struct OnnxRegressor {
    plan: OnnxPlan,
}

impl OnnxRegressor {
    /// Load and optimize a model taking a single `f32[1, 5]` input
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let load_error = |e: TractError| InferenceError::ModelLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        info!("Loading ONNX model from {}", path.display());
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(load_error)?;

        Ok(Self { plan })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let failed = |e: TractError| InferenceError::InferenceFailed(e.to_string());

        let input: Vec<f32> = features.values.iter().map(|&v| v as f32).collect();
        let tensor = Tensor::from_shape(&[1, FEATURE_DIMENSION], &input).map_err(failed)?;
        let outputs = self.plan.run(tvec!(tensor.into())).map_err(failed)?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no output".to_string()))?
            .cast_to::<f64>()
            .map_err(failed)?;
        let value = output
            .as_slice::<f64>()
            .map_err(failed)?
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InferenceFailed("model output is empty".to_string()))?;

        debug!("ONNX output: {}", value);
        Ok(value)
    }
}

/// Linear model `w · x + c`, used when no trained artifact is wanted (tests, local runs)
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    pub weights: [f64; FEATURE_DIMENSION],
    pub intercept: f64,
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(self
            .weights
            .iter()
            .zip(features.values.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept)
    }
}
