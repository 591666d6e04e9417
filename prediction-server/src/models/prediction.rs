//! Prediction request model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use potability_core::{coerce_inputs, FeatureInputs, LayoutInfo, PredictionError};

/// Body of `POST /predict`.
///
/// Feature keys are collected loosely and coerced later so that a bad value
/// is reported against its field name.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PredictRequest {
    pub fn feature_inputs(&self) -> Result<FeatureInputs, PredictionError> {
        coerce_inputs(&self.fields)
    }
}

#[derive(Debug, Serialize)]
pub struct SeverityFloors {
    pub high: f64,
    pub medium: f64,
}

/// Body of `GET /model`
#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub layout: LayoutInfo,
    pub classifier: String,
    pub threshold: f64,
    pub severity_floors: SeverityFloors,
}
