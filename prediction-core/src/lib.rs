//! Water Potability Core
//!
//! Decision pipeline behind the prediction server.
//!
//! ```text
//! request fields ──▶ features::coerce_inputs ──▶ FeatureVector (9, fixed order)
//!                                                      │
//!                                                      ▼
//!                                          model::Classifier (ONNX)
//!                                                      │ P(potable)
//!                                                      ▼
//!                      DecisionThreshold (>=)  +  Severity (0.8 / 0.5 floors)
//!                                                      │
//!                                                      ▼
//!                                              PredictionResult
//! ```

pub mod error;
pub mod features;
pub mod model;
pub mod service;

pub use error::{CoreResult, PredictionError};
pub use features::{coerce_inputs, FeatureInputs, FeatureVector, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use model::{Classifier, DecisionThreshold, OnnxClassifier, Severity};
pub use service::{PredictionResult, PredictionService};
