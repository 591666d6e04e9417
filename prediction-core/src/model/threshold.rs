//! Decision Threshold
//!
//! The probability cutoff chosen at training time. Loaded once from its own
//! artifact and never adjusted afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, PredictionError};

/// Threshold artifact on disk: a bare number or `{"threshold": x}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ThresholdFile {
    Bare(f64),
    Wrapped { threshold: f64 },
}

impl ThresholdFile {
    fn value(&self) -> f64 {
        match self {
            ThresholdFile::Bare(v) => *v,
            ThresholdFile::Wrapped { threshold } => *threshold,
        }
    }
}

/// Process-wide decision threshold, always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DecisionThreshold(f64);

impl DecisionThreshold {
    pub fn new(value: f64) -> CoreResult<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(PredictionError::ModelUnavailable(format!(
                "threshold {} is outside [0, 1]",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn from_json(text: &str) -> CoreResult<Self> {
        let parsed: ThresholdFile = serde_json::from_str(text.trim()).map_err(|e| {
            PredictionError::ModelUnavailable(format!("threshold artifact is corrupt: {}", e))
        })?;
        Self::new(parsed.value())
    }

    /// Load threshold artifact from file
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        log::info!("Loading decision threshold from: {}", path.display());

        let text = std::fs::read_to_string(path).map_err(|e| {
            PredictionError::ModelUnavailable(format!(
                "cannot read threshold {}: {}",
                path.display(),
                e
            ))
        })?;

        let threshold = Self::from_json(&text)?;
        log::info!("Decision threshold: {}", threshold.get());
        Ok(threshold)
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    /// Inclusive: a probability equal to the threshold is positive.
    pub fn is_positive(&self, probability: f64) -> bool {
        probability >= self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn artifact(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_bare_number() {
        let file = artifact("0.4234\n");
        let threshold = DecisionThreshold::load(file.path()).unwrap();
        assert_eq!(threshold.get(), 0.4234);
    }

    #[test]
    fn test_load_wrapped_object() {
        let file = artifact(r#"{"threshold": 0.61}"#);
        let threshold = DecisionThreshold::load(file.path()).unwrap();
        assert_eq!(threshold.get(), 0.61);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DecisionThreshold::load(dir.path().join("best_threshold.json")).unwrap_err();
        assert!(matches!(err, PredictionError::ModelUnavailable(_)));
    }

    #[test]
    fn test_load_corrupt_file() {
        let file = artifact("not a threshold");
        let err = DecisionThreshold::load(file.path()).unwrap_err();
        assert!(matches!(err, PredictionError::ModelUnavailable(_)));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(DecisionThreshold::new(-0.01).is_err());
        assert!(DecisionThreshold::new(1.5).is_err());
        assert!(DecisionThreshold::new(f64::NAN).is_err());
        assert!(DecisionThreshold::new(0.0).is_ok());
        assert!(DecisionThreshold::new(1.0).is_ok());
    }

    #[test]
    fn test_is_positive_inclusive() {
        let threshold = DecisionThreshold::new(0.42).unwrap();
        assert!(threshold.is_positive(0.42));
        assert!(threshold.is_positive(0.9));
        assert!(!threshold.is_positive(0.4199));
    }
}
