//! Feature Vector - ordered classifier input
//!
//! Built from named request fields using the layout in `layout.rs`.
//! Absent measurements stay absent: no imputation happens here, the
//! classifier pipeline decides what a missing value means.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::error::{CoreResult, PredictionError};

/// Named inputs as they arrive from a caller: feature name to optional value.
pub type FeatureInputs = HashMap<String, Option<f64>>;

// ============================================================================
// FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Values in the order defined by FEATURE_LAYOUT
    values: [Option<f64>; FEATURE_COUNT],
}

impl FeatureVector {
    /// Vector with every measurement absent
    pub fn empty() -> Self {
        Self {
            values: [None; FEATURE_COUNT],
        }
    }

    pub fn from_values(values: [Option<f64>; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Assemble in layout order. Keys outside the layout are ignored.
    pub fn from_inputs(inputs: &FeatureInputs) -> Self {
        let mut values = [None; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_LAYOUT) {
            *slot = inputs.get(*name).copied().flatten();
        }
        Self { values }
    }

    pub fn as_array(&self) -> &[Option<f64>; FEATURE_COUNT] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Number of measurements actually supplied
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Tensor row for the classifier. Absent values are encoded as NaN.
    ///
    /// Values are narrowed to f32 without range checks: magnitudes beyond
    /// f32::MAX become infinite, and "inf" / "nan" strings pass through as
    /// such. The classifier pipeline decides what they mean.
    pub fn to_tensor_row(&self) -> [f32; FEATURE_COUNT] {
        let mut row = [f32::NAN; FEATURE_COUNT];
        for (dst, src) in row.iter_mut().zip(self.values.iter()) {
            if let Some(v) = src {
                *dst = *v as f32;
            }
        }
        row
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// INPUT COERCION
// ============================================================================

/// Coerce one JSON value the way a numeric column would.
///
/// `null` is absent; numbers pass through; strings are parsed after trimming;
/// booleans become 1.0 / 0.0. Anything else is `InvalidInput`.
pub fn coerce_value(field: &str, value: &Value) -> CoreResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| PredictionError::invalid_input(field, "number out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| PredictionError::invalid_input(field, format!("could not convert '{}' to float", s))),
        Value::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
        Value::Array(_) => Err(PredictionError::invalid_input(field, "expected a number, got an array")),
        Value::Object(_) => Err(PredictionError::invalid_input(field, "expected a number, got an object")),
    }
}

/// Pick the layout fields out of a JSON object and coerce them.
///
/// Keys that are not features are ignored, whatever their type.
pub fn coerce_inputs(body: &Map<String, Value>) -> CoreResult<FeatureInputs> {
    let mut inputs = FeatureInputs::with_capacity(FEATURE_COUNT);
    for name in FEATURE_LAYOUT {
        let value = match body.get(*name) {
            Some(raw) => coerce_value(name, raw)?,
            None => None,
        };
        inputs.insert((*name).to_string(), value);
    }
    Ok(inputs)
}
