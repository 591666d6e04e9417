//! Water Potability Prediction Server
//!
//! HTTP front for the potability classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  POTABILITY SERVER                        │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌─────────────────────────────────────┐  │
//! │  │  Router   │──▶│  PredictionService (potability-core)│  │
//! │  │  (Axum)   │   │  features → ONNX → threshold/tier   │  │
//! │  └───────────┘   └──────────────────┬──────────────────┘  │
//! │                                     ▼                     │
//! │                 water_potability_model.onnx               │
//! │                 best_threshold.json   (loaded once)       │
//! └───────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use potability_core::PredictionService;

pub use error::AppResult;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Water Potability Prediction Server starting...");
    tracing::info!("Artifact directory: {}", config.artifact_dir.display());
    tracing::info!("Model: {}", config.model_path.display());
    tracing::info!("Threshold: {}", config.threshold_path.display());

    // Artifacts are loaded once; without them there is nothing to serve.
    let service = PredictionService::load(&config.model_path, &config.threshold_path)
        .context("Failed to load prediction artifacts")?;

    tracing::info!(
        "Classifier '{}' ready, decision threshold {}",
        service.classifier_name(),
        service.threshold().get()
    );

    let state = AppState { service };
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::home))
        .route("/health", get(handlers::health::check))
        .route("/model", get(handlers::model::info))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
