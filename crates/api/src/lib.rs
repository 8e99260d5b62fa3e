//! Cycle Life Prediction API Server
//!
//! REST API serving the trained cycle-life regressor, both for callers with
//! pre-computed features and for devices streaming raw cycle samples.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod settings;
mod error;
mod routes;


pub use settings::{LoggingSettings, ServerSettings, Settings};
pub use error::ApiError;

use accumulator::AccumulatorStore;
use data_validator::Validator;
use feature_engine::FeatureExtractor;
use inference_engine::InferenceEngine;

/// Application state shared across handlers
pub struct AppState {
    /// Loaded model behind the prediction gateway
    pub engine: Arc<InferenceEngine>,
    /// Per-device power-law history
    pub accumulator: AccumulatorStore,
    pub extractor: FeatureExtractor,
    pub validator: Validator,
    /// Prometheus exporter, when the recorder was installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

/// State handle passed to handlers
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state around a loaded engine
    pub fn new(engine: InferenceEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            accumulator: AccumulatorStore::new(),
            extractor: FeatureExtractor::new(),
            validator: Validator::default(),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Expose metrics rendered by `handle` at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_file: String,
    pub features: Vec<&'static str>,
    pub version: String,
    pub uptime_seconds: u64,
    pub devices_tracked: usize,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", post(routes::predict::predict))
        .route("/ingest_simple", post(routes::ingest::ingest_simple))
        .route("/devices/:device_id", get(routes::devices::get_device))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_file: state.engine.model_file().to_string(),
        features: state.engine.feature_names().to_vec(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        devices_tracked: state.accumulator.device_count(),
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let handle = state.metrics.as_ref().ok_or(ApiError::MetricsDisabled)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}

/// Initialize logging
pub fn init_logging(
    settings: &LoggingSettings,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = settings.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    if !settings.level.eq_ignore_ascii_case(level.as_str()) {
        warn!("Unknown log level {:?}, using {}", settings.level, level);
    }
    Ok(())
}

/// Run the server until the listener fails
pub async fn run_server(addr: &str, state: AppState) -> std::io::Result<()> {
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
