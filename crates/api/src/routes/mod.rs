//! HTTP Routes

pub mod devices;
pub mod ingest;
pub mod predict;

use std::sync::Arc;
use std::time::Instant;

use feature_engine::FeatureVector;
use inference_engine::{InferenceEngine, PredictionResult};
use metrics::{counter, histogram};
use serde::Serialize;
use tracing::debug;

use crate::ApiError;

/// Prediction payload shared by all prediction routes
#[derive(Debug, Serialize)]
pub struct PredictionBody {
    pub cycle_life: f64,
}

/// Active model identity, reported for traceability
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub file: String,
    pub features: Vec<&'static str>,
}

impl From<&InferenceEngine> for ModelInfo {
    fn from(engine: &InferenceEngine) -> Self {
        Self {
            file: engine.model_file().to_string(),
            features: engine.feature_names().to_vec(),
        }
    }
}

/// Run the blocking model call off the async workers. Not retried on failure.
pub(crate) async fn run_inference(
    engine: &Arc<InferenceEngine>,
    features: FeatureVector,
    route: &'static str,
) -> Result<PredictionResult, ApiError> {
    let start = Instant::now();
    let engine = Arc::clone(engine);

    let outcome = tokio::task::spawn_blocking(move || engine.predict(&features))
        .await
        .map_err(|e| ApiError::Internal(format!("inference task aborted: {e}")))?;

    histogram!("inference_latency_seconds").record(start.elapsed().as_secs_f64());
    match outcome {
        Ok(result) => {
            counter!("predictions_total", "route" => route).increment(1);
            debug!("{} prediction: cycle_life={:.2}", route, result.cycle_life);
            Ok(result)
        }
        Err(e) => {
            counter!("prediction_failures_total", "route" => route).increment(1);
            Err(e.into())
        }
    }
}
