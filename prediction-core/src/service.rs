//! Prediction Service - the decision pipeline
//!
//! Holds the classifier and threshold for the life of the process and turns
//! named measurements into a potability decision. Nothing in here logs or
//! stores; callers own those concerns.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, PredictionError};
use crate::features::{FeatureInputs, FeatureVector};
use crate::model::{Classifier, DecisionThreshold, OnnxClassifier, Severity};

/// Outcome of one prediction, shaped like the HTTP response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "potability_prediction")]
    pub prediction: u8,
    pub probability: f64,
    pub threshold_used: f64,
    pub severity: Severity,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone)]
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
    threshold: DecisionThreshold,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("classifier", &self.classifier.name())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl PredictionService {
    pub fn new(classifier: Arc<dyn Classifier>, threshold: DecisionThreshold) -> Self {
        Self { classifier, threshold }
    }

    /// Load both artifacts. Any failure is `ModelUnavailable`.
    pub fn load(model_path: impl AsRef<Path>, threshold_path: impl AsRef<Path>) -> CoreResult<Self> {
        let classifier = OnnxClassifier::load(model_path)?;
        let threshold = DecisionThreshold::load(threshold_path)?;
        Ok(Self::new(Arc::new(classifier), threshold))
    }

    pub fn threshold(&self) -> DecisionThreshold {
        self.threshold
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Score named inputs and apply the decision policy.
    ///
    /// Missing features are forwarded as absent. Coordinates are echoed.
    pub fn predict(
        &self,
        inputs: &FeatureInputs,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> CoreResult<PredictionResult> {
        let features = FeatureVector::from_inputs(inputs);
        self.predict_vector(&features, latitude, longitude)
    }

    pub fn predict_vector(
        &self,
        features: &FeatureVector,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> CoreResult<PredictionResult> {
        let probability = self.classifier.predict_proba(features)?;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(PredictionError::Inference(format!(
                "classifier returned probability {} outside [0, 1]",
                probability
            )));
        }

        Ok(PredictionResult {
            prediction: u8::from(self.threshold.is_positive(probability)),
            probability,
            threshold_used: self.threshold.get(),
            severity: Severity::from_probability(probability),
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;
    use parking_lot::Mutex;

    /// Returns a fixed probability and remembers what it was asked.
    struct FixedClassifier {
        probability: f64,
        seen: Mutex<Vec<FeatureVector>>,
    }

    impl FixedClassifier {
        fn new(probability: f64) -> Arc<Self> {
            Arc::new(Self {
                probability,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Classifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict_proba(&self, features: &FeatureVector) -> CoreResult<f64> {
            self.seen.lock().push(*features);
            Ok(self.probability)
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict_proba(&self, _features: &FeatureVector) -> CoreResult<f64> {
            Err(PredictionError::Inference("graph exploded".to_string()))
        }
    }

    fn service(probability: f64, threshold: f64) -> PredictionService {
        PredictionService::new(
            FixedClassifier::new(probability),
            DecisionThreshold::new(threshold).unwrap(),
        )
    }

    fn full_inputs() -> FeatureInputs {
        [
            ("ph", 7.08),
            ("Hardness", 204.89),
            ("Solids", 20791.3),
            ("Chloramines", 7.3),
            ("Sulfate", 368.5),
            ("Conductivity", 564.3),
            ("Organic_carbon", 10.37),
            ("Trihalomethanes", 86.99),
            ("Turbidity", 2.96),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), Some(v)))
        .collect()
    }

    #[test]
    fn test_prediction_follows_threshold() {
        for (probability, threshold, expected) in [
            (0.9, 0.5, 1),
            (0.2, 0.5, 0),
            (0.5, 0.5, 1),
            (0.0, 0.0, 1),
            (0.99, 1.0, 0),
        ] {
            let result = service(probability, threshold)
                .predict(&full_inputs(), None, None)
                .unwrap();
            assert_eq!(result.prediction, expected, "p={probability} t={threshold}");
            assert_eq!(result.prediction == 1, result.probability >= result.threshold_used);
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let result = service(0.42, 0.42).predict(&full_inputs(), None, None).unwrap();
        assert_eq!(result.prediction, 1);
    }

    #[test]
    fn test_severity_ignores_threshold() {
        for (probability, severity) in [
            (0.9, Severity::High),
            (0.5, Severity::Medium),
            (0.79, Severity::Medium),
            (0.1, Severity::Low),
        ] {
            for threshold in [0.1, 0.5, 0.95] {
                let result = service(probability, threshold)
                    .predict(&full_inputs(), None, None)
                    .unwrap();
                assert_eq!(result.severity, severity);
            }
        }
    }

    #[test]
    fn test_prediction_and_severity_can_disagree() {
        let result = service(0.4, 0.3).predict(&full_inputs(), None, None).unwrap();
        assert_eq!(result.prediction, 1);
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn test_threshold_used_is_stable() {
        let svc = service(0.6, 0.37);
        for _ in 0..3 {
            let result = svc.predict(&full_inputs(), None, None).unwrap();
            assert_eq!(result.threshold_used, 0.37);
        }
        assert_eq!(svc.threshold().get(), 0.37);
    }

    #[test]
    fn test_coordinates_echoed() {
        let svc = service(0.6, 0.5);

        let result = svc.predict(&full_inputs(), Some(3.139), Some(101.6869)).unwrap();
        assert_eq!(result.latitude, Some(3.139));
        assert_eq!(result.longitude, Some(101.6869));

        let result = svc.predict(&full_inputs(), None, None).unwrap();
        assert_eq!(result.latitude, None);
        assert_eq!(result.longitude, None);
    }

    #[test]
    fn test_missing_features_forwarded_as_absent() {
        let classifier = FixedClassifier::new(0.3);
        let svc = PredictionService::new(classifier.clone(), DecisionThreshold::new(0.5).unwrap());

        let mut inputs = full_inputs();
        inputs.remove("Sulfate");
        inputs.insert("ph".to_string(), None);

        let result = svc.predict(&inputs, None, None).unwrap();
        assert_eq!(result.prediction, 0);

        let seen = classifier.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get_by_name("ph"), None);
        assert_eq!(seen[0].get_by_name("Sulfate"), None);
        assert_eq!(seen[0].get_by_name("Hardness"), Some(204.89));
        assert_eq!(seen[0].present_count(), FEATURE_COUNT - 2);
    }

    #[test]
    fn test_empty_inputs_still_scored() {
        let result = service(0.55, 0.5)
            .predict(&FeatureInputs::new(), None, None)
            .unwrap();
        assert_eq!(result.severity, Severity::Medium);
    }

    #[test]
    fn test_out_of_range_probability_is_inference_error() {
        for bad in [1.2, -0.1, f64::NAN] {
            let err = service(bad, 0.5).predict(&full_inputs(), None, None).unwrap_err();
            assert!(matches!(err, PredictionError::Inference(_)));
        }
    }

    #[test]
    fn test_classifier_failure_propagates() {
        let svc = PredictionService::new(Arc::new(FailingClassifier), DecisionThreshold::new(0.5).unwrap());
        let err = svc.predict(&full_inputs(), None, None).unwrap_err();
        assert!(matches!(err, PredictionError::Inference(_)));
    }

    #[test]
    fn test_result_json_shape() {
        let result = service(0.85, 0.5)
            .predict(&full_inputs(), Some(3.1), None)
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["potability_prediction"], 1);
        assert_eq!(json["probability"], 0.85);
        assert_eq!(json["threshold_used"], 0.5);
        assert_eq!(json["severity"], "High");
        assert_eq!(json["latitude"], 3.1);
        assert!(json["longitude"].is_null());
    }

    #[test]
    fn test_onnx_nan_probability_is_inference_error() {
        // Fixture graph echoes columns 0..2, so an absent Hardness comes
        // back as a NaN positive-class probability.
        let classifier = OnnxClassifier::load_from_bytes(include_bytes!(
            "../tests/fixtures/passthrough_9.onnx"
        ))
        .unwrap();
        let svc = PredictionService::new(Arc::new(classifier), DecisionThreshold::new(0.5).unwrap());

        let mut inputs = full_inputs();
        inputs.insert("ph".to_string(), Some(0.25));
        inputs.insert("Hardness".to_string(), Some(0.75));
        let result = svc.predict(&inputs, None, None).unwrap();
        assert_eq!(result.probability, 0.75);
        assert_eq!(result.prediction, 1);
        assert_eq!(result.severity, Severity::Medium);

        inputs.remove("Hardness");
        let err = svc.predict(&inputs, None, None).unwrap_err();
        assert!(matches!(err, PredictionError::Inference(_)));
    }

    #[test]
    fn test_load_fails_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let err = PredictionService::load(
            dir.path().join("water_potability_model.onnx"),
            dir.path().join("best_threshold.json"),
        )
        .unwrap_err();
        assert!(matches!(err, PredictionError::ModelUnavailable(_)));
    }
}
