//! API Error Mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid JSON body: {0}")]
    BadJson(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("feature extraction failed: {0}")]
    Feature(#[from] FeatureError),
    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),
    #[error("unknown device: {0}")]
    UnknownDevice(String),
    #[error("metrics exporter not installed")]
    MetricsDisabled,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadJson(rejection.body_text())
    }
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadJson(_) | ApiError::Validation(_) | ApiError::Feature(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnknownDevice(_) | ApiError::MetricsDisabled => StatusCode::NOT_FOUND,
            ApiError::Inference(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        if status.is_server_error() {
            warn!("Request failed: {}", detail);
        } else {
            debug!("Request rejected: {}", detail);
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
