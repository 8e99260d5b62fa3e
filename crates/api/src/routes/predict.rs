//! Prediction from Pre-Computed Features

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use super::{run_inference, ModelInfo, PredictionBody};
use crate::{ApiError, SharedState};

/// Response for the predict endpoint
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: PredictionBody,
    pub model: ModelInfo,
}

/// Predict cycle life from a named `f1`..`f5` feature mapping.
///
/// Body: `{"features": {"f1": .., .., "f5": ..}, "metadata": ..}`; metadata is
/// accepted and ignored.
pub async fn predict(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(payload) = payload?;
    let features = state.validator.validate_features(&payload)?;

    let result = run_inference(&state.engine, features, "predict").await?;

    Ok(Json(PredictResponse {
        prediction: PredictionBody {
            cycle_life: result.cycle_life,
        },
        model: ModelInfo::from(state.engine.as_ref()),
    }))
}
