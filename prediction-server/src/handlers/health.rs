//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

pub const LIVENESS_MESSAGE: &str = "Water Potability Prediction Server is running!";

/// Plain-text liveness check
pub async fn home() -> &'static str {
    LIVENESS_MESSAGE
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model: String,
    threshold: f64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        model: state.service.classifier_name().to_string(),
        threshold: state.service.threshold().get(),
    })
}
