//! Features Module - classifier input schema
//!
//! `layout` owns the column order, `vector` turns named request fields
//! into an ordered row.

pub mod layout;
pub mod vector;

// Re-export common types
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use vector::{coerce_inputs, coerce_value, FeatureInputs, FeatureVector};
