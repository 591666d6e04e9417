//! Request and response models

pub mod prediction;

pub use prediction::{ModelInfoResponse, PredictRequest, SeverityFloors};
