//! Model Module - classifier, threshold and severity policy
//!
//! Inference is kept apart from the decision rules so the classifier can be
//! swapped (or stubbed in tests) without touching them.

pub mod inference;
pub mod severity;
pub mod threshold;

// Re-export common types
pub use inference::{Classifier, OnnxClassifier};
pub use severity::{Severity, HIGH_SEVERITY_FLOOR, MEDIUM_SEVERITY_FLOOR};
pub use threshold::DecisionThreshold;
