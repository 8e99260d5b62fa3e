//! Raw Cycle Ingestion

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use feature_engine::FeatureVector;
use metrics::counter;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::{run_inference, ModelInfo, PredictionBody};
use crate::{ApiError, SharedState};

/// Features derived for the ingested cycle
#[derive(Debug, Serialize)]
pub struct IngestFeatures {
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub a: f64,
    pub b: f64,
    pub cycle_index: u64,
}

/// Response for the ingest endpoint
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub features: IngestFeatures,
    pub prediction: PredictionBody,
    pub model: ModelInfo,
}

/// Ingest one cycle of raw samples from a device and predict its cycle life.
///
/// The device's power-law history is updated as soon as extraction succeeds;
/// a later inference failure does not undo it.
pub async fn ingest_simple(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    let Json(payload) = payload?;
    let request = state.validator.validate_cycle(&payload)?;

    let cycle = state
        .extractor
        .extract(&request.samples, request.commanded_current)?;

    let fit = state
        .accumulator
        .update(&request.device_id, request.cycle_index, cycle.f3);
    counter!("ingest_cycles_total").increment(1);
    info!(
        "Device {} cycle {}: f1={:.4}, f2={:.4}, f3={:.4}, a={:.4}, b={:.4} ({} cycles)",
        request.device_id, request.cycle_index, cycle.f1, cycle.f2, cycle.f3, fit.a, fit.b, fit.cycles
    );

    let features = FeatureVector::from_cycle(&cycle, fit.a, fit.b);
    let result = run_inference(&state.engine, features, "ingest").await?;

    Ok(Json(IngestResponse {
        features: IngestFeatures {
            f1: cycle.f1,
            f2: cycle.f2,
            f3: cycle.f3,
            a: fit.a,
            b: fit.b,
            cycle_index: request.cycle_index,
        },
        prediction: PredictionBody {
            cycle_life: result.cycle_life,
        },
        model: ModelInfo::from(state.engine.as_ref()),
    }))
}
