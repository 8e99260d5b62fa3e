//! Cycle Life Predictor - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, AppState, Settings};
use inference_engine::InferenceEngine;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CYCLE_LIFE_CONFIG").ok());
    let settings = Settings::load(config_path.as_deref()).context("loading configuration")?;

    init_logging(&settings.logging)?;

    info!("=== Cycle Life Predictor v{} ===", env!("CARGO_PKG_VERSION"));

    // refuse to start without a model
    let engine = InferenceEngine::load(&settings.model).context("loading model")?;

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("installing metrics recorder")?;

    let state = AppState::new(engine).with_metrics(metrics);
    run_server(&settings.server.bind, state).await?;

    Ok(())
}
