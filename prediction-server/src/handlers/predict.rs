//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use potability_core::PredictionResult;

use crate::models::PredictRequest;
use crate::{AppResult, AppState};

/// Score one water sample
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Json(req) = payload?;
    let inputs = req.feature_inputs()?;

    // ONNX Runtime is synchronous; keep it off the async workers.
    let service = state.service.clone();
    let (latitude, longitude) = (req.latitude, req.longitude);
    let result = tokio::task::spawn_blocking(move || service.predict(&inputs, latitude, longitude))
        .await??;

    tracing::debug!(
        "Prediction: potable={} probability={:.4} severity={}",
        result.prediction,
        result.probability,
        result.severity
    );

    Ok(Json(result))
}
