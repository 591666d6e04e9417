//! Model metadata handler

use axum::{extract::State, Json};

use potability_core::{model::HIGH_SEVERITY_FLOOR, model::MEDIUM_SEVERITY_FLOOR, LayoutInfo};

use crate::models::{ModelInfoResponse, SeverityFloors};
use crate::AppState;

/// Feature layout and decision constants, for clients building requests
pub async fn info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        layout: LayoutInfo::current(),
        classifier: state.service.classifier_name().to_string(),
        threshold: state.service.threshold().get(),
        severity_floors: SeverityFloors {
            high: HIGH_SEVERITY_FLOOR,
            medium: MEDIUM_SEVERITY_FLOOR,
        },
    })
}
