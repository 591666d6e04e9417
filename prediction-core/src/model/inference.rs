//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the exported potability classifier and scores one feature row at a
//! time. The exported graph is expected to carry its own preprocessing
//! (imputer, scaler), so rows are handed over raw with NaN for gaps.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::{Value, ValueType};
use parking_lot::Mutex;

use crate::error::{CoreResult, PredictionError};
use crate::features::{FeatureVector, FEATURE_COUNT};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Anything that can turn a feature row into a potable-class probability.
///
/// Implementations are shared across request handlers, hence `Send + Sync`.
pub trait Classifier: Send + Sync {
    /// Human readable model identifier (path or label)
    fn name(&self) -> &str;

    /// Probability of the positive ("potable") class
    fn predict_proba(&self, features: &FeatureVector) -> CoreResult<f64>;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

pub struct OnnxClassifier {
    // `Session::run` needs `&mut`, so concurrent requests take turns here.
    session: Mutex<Session>,
    input_name: String,
    probability_output: String,
    model_name: String,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .field("probability_output", &self.probability_output)
            .finish()
    }
}

fn unavailable(context: &str, e: impl std::fmt::Display) -> PredictionError {
    PredictionError::ModelUnavailable(format!("{}: {}", context, e))
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(model_path: impl AsRef<Path>) -> CoreResult<Self> {
        let model_path = model_path.as_ref();
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(PredictionError::ModelUnavailable(format!(
                "Model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| unavailable("Failed to create session builder", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| unavailable("Failed to set optimization", e))?
            .commit_from_file(model_path)
            .map_err(|e| unavailable("Failed to load model", e))?;

        Self::from_session(session, model_path.display().to_string())
    }

    /// Load ONNX model from bytes (embedded or already read artifacts)
    pub fn load_from_bytes(model_bytes: &[u8]) -> CoreResult<Self> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| unavailable("Session builder error", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| unavailable("Optimization error", e))?
            .commit_from_memory(model_bytes)
            .map_err(|e| unavailable("Load from memory error", e))?;

        Self::from_session(session, "<memory>".to_string())
    }

    fn from_session(session: Session, model_name: String) -> CoreResult<Self> {
        let input = session
            .inputs
            .first()
            .ok_or_else(|| PredictionError::ModelUnavailable("Model declares no inputs".to_string()))?;
        check_float_tensor("Input", &input.name, &input.input_type)?;

        // Dynamic dimensions are reported as -1 and accepted as-is.
        if let Some(width) = input
            .input_type
            .tensor_shape()
            .and_then(|shape| shape.get(1).copied())
        {
            if width > 0 && width as usize != FEATURE_COUNT {
                return Err(PredictionError::ModelUnavailable(format!(
                    "Model expects {} features, layout has {}",
                    width, FEATURE_COUNT
                )));
            }
        }
        let input_name = input.name.clone();

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let probability_output = select_probability_output(&output_names)
            .ok_or_else(|| PredictionError::ModelUnavailable("Model declares no outputs".to_string()))?
            .to_string();

        // Anything but a float32 table would fail on every request instead.
        if let Some(output) = session.outputs.iter().find(|o| o.name == probability_output) {
            check_float_tensor("Output", &output.name, &output.output_type)?;
        }

        log::info!(
            "ONNX model loaded: input '{}', probability output '{}'",
            input_name,
            probability_output
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            probability_output,
            model_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn predict_proba(&self, features: &FeatureVector) -> CoreResult<f64> {
        let row = features.to_tensor_row();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), row.to_vec())
            .map_err(|e| PredictionError::Inference(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| PredictionError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| PredictionError::Inference(format!("Inference failed: {}", e)))?;

        let output = outputs.get(self.probability_output.as_str()).ok_or_else(|| {
            PredictionError::Inference(format!("Missing output '{}'", self.probability_output))
        })?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictionError::Inference(format!("Extract error: {}", e)))?;

        positive_class_probability(data)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Reject anything that is not a float32 tensor.
///
/// Catches double-precision exports and ZipMap (`seq(map)`) probability
/// outputs while the model loads.
pub fn check_float_tensor(role: &str, name: &str, value_type: &ValueType) -> CoreResult<()> {
    match value_type {
        ValueType::Tensor { ty: TensorElementType::Float32, .. } => Ok(()),
        other => Err(PredictionError::ModelUnavailable(format!(
            "{} '{}' must be a float32 tensor, model declares {:?}",
            role, name, other
        ))),
    }
}

/// Prefer an output named like `probabilities`, else the last one declared.
///
/// Classifier exports put the label first and the probability table last.
pub fn select_probability_output(names: &[String]) -> Option<&str> {
    names
        .iter()
        .find(|n| n.to_ascii_lowercase().contains("probabilit"))
        .or_else(|| names.last())
        .map(String::as_str)
}

/// Read the potable probability out of a single-row probability tensor.
///
/// `[p0, p1]` is a two-class table, `[p]` is already the positive class.
/// Values are widened from f32, so 0.7 comes back as 0.699999988079071.
pub fn positive_class_probability(data: &[f32]) -> CoreResult<f64> {
    match data {
        [p] => Ok(f64::from(*p)),
        [_, p1] => Ok(f64::from(*p1)),
        other => Err(PredictionError::Inference(format!(
            "Expected 1 or 2 probability columns, got {}",
            other.len()
        ))),
    }
}
