//! Device Accumulator Routes

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{ApiError, SharedState};

/// Current power-law fit of a device
#[derive(Debug, Serialize)]
pub struct DeviceResponse {
    pub device_id: String,
    pub cycles: u64,
    pub a: f64,
    pub b: f64,
}

/// Read-only view of a device's accumulated history
pub async fn get_device(
    State(state): State<SharedState>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let fit = state
        .accumulator
        .snapshot(&device_id)
        .ok_or_else(|| ApiError::UnknownDevice(device_id.clone()))?;

    Ok(Json(DeviceResponse {
        device_id,
        cycles: fit.cycles,
        a: fit.a,
        b: fit.b,
    }))
}
