mod common;

use common::{gradient_png, gray_png, solid_png, synthetic_service};
use engine::classifier::synthetic::WEIGHT_FLOOR;
use engine::{ClassifierError, ConfigError, DiagnosisService, EngineConfig, InferenceError};
use ndarray::Array3;
use shared::{ConfidenceTier, DiseaseClass, ErrorKind, Provenance};
use std::sync::Arc;

#[test]
fn gray_image_is_deterministic() {
    let service = synthetic_service();
    let bytes = gray_png();

    let first = service.classify_image(&bytes).unwrap();
    let second = service.classify_image(&bytes).unwrap();

    assert!((first.statistics.mean - 0.502).abs() < 0.01);
    assert_eq!(first.top_prediction.disease_class, second.top_prediction.disease_class);
    assert_eq!(first.top_prediction.confidence, second.top_prediction.confidence);
    assert_eq!(first.top_predictions, second.top_predictions);
    assert_eq!(first.all_predictions, second.all_predictions);
    assert_eq!(first.image_hash, second.image_hash);
    assert_ne!(first.id, second.id);
}

#[test]
fn synthetic_results_are_flagged_as_mock() {
    let result = synthetic_service().classify_image(&gray_png()).unwrap();
    assert!(result.is_mock);
    assert_eq!(result.provenance, Provenance::Synthetic);
    assert_eq!(result.model_version, "synthetic-v1");
    assert_eq!(result.top_predictions.len(), 3);
    assert_eq!(result.all_predictions.len(), 6);
    assert_eq!(result.image_hash.len(), 64);
}

#[test]
fn probability_vector_invariant_holds_across_inputs() {
    let service = synthetic_service();
    let mut inputs = vec![
        solid_png(16, 16, [0, 0, 0]),
        solid_png(16, 16, [255, 255, 255]),
        solid_png(20, 10, [30, 90, 20]),
        solid_png(40, 40, [200, 220, 180]),
    ];
    inputs.extend((0..12u8).map(|i| gradient_png(24 + i as u32, 24, i * 17)));

    for bytes in &inputs {
        let result = service.classify_image(bytes).unwrap();
        let total: f64 = result.all_predictions.iter().map(|p| p.probability).sum();
        assert!((total - 1.0).abs() < 1e-9, "weights sum to {}", total);
        for p in &result.all_predictions {
            assert!(p.probability >= WEIGHT_FLOOR - 1e-12, "{:?} below floor", p);
        }
        let confidence = result.top_prediction.confidence;
        assert!((0.6..=0.95).contains(&confidence), "confidence {} out of bounds", confidence);
        assert_ne!(result.top_prediction.severity_tier, ConfidenceTier::Low);
    }
}

#[test]
fn ranking_is_descending_and_starts_at_one() {
    let result = synthetic_service().classify_image(&gradient_png(50, 30, 9)).unwrap();
    let ranks: Vec<usize> = result.top_predictions.iter().map(|p| p.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    for pair in result.top_predictions.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
    assert_eq!(result.top_prediction, result.top_predictions[0]);
    assert_eq!(result.disease_info.class_id, result.top_prediction.disease_class.to_string());
    assert_eq!(result.recommendation.disease, result.disease_info.name);
}

#[test]
fn bright_images_lean_healthy() {
    let service = synthetic_service();
    // healthy prior is 0.6 against at most 0.1 + 0.2 of noise swing elsewhere
    for shade in [200u8, 220, 240, 255] {
        let result = service.classify_image(&solid_png(12, 12, [shade, shade, shade])).unwrap();
        assert_eq!(result.top_prediction.disease_class, DiseaseClass::Healthy);
        assert_eq!(result.recommendation.urgency, shared::Urgency::Preventive);
        assert!(result.is_healthy);
    }
}

#[test]
fn corrupt_and_empty_inputs_fail_cleanly() {
    let service = synthetic_service();
    let png = gray_png();

    let err = service.classify_image(&png[..20]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidImageFormat);

    let err = service.classify_image(&[]).unwrap_err();
    assert!(matches!(err, InferenceError::EmptyInput));
}

fn low_confidence_classifier(_: &Array3<f32>) -> Result<Vec<f32>, ClassifierError> {
    Ok(vec![0.05, 0.4, 0.2, 0.15, 0.1, 0.1])
}

#[test]
fn model_backed_reports_raw_confidence() {
    let service =
        DiagnosisService::with_classifier(EngineConfig::default(), Arc::new(low_confidence_classifier))
            .unwrap();
    let result = service.classify_image(&gray_png()).unwrap();

    assert!(!result.is_mock);
    assert_eq!(result.provenance, Provenance::Model);
    assert_eq!(result.top_prediction.disease_class, DiseaseClass::BacterialBlight);
    assert!(!result.is_healthy);
    assert!(result.processing_time_ms >= 0.0);
    assert!((result.top_prediction.confidence - 0.4).abs() < 1e-6);
    assert_eq!(result.top_prediction.severity_tier, ConfidenceTier::Low);
    assert!(result.recommendation.guidance[0].starts_with("Low confidence prediction"));
}

fn broken_classifier(_: &Array3<f32>) -> Result<Vec<f32>, ClassifierError> {
    Ok(vec![1.0, 0.0])
}

#[test]
fn failing_model_falls_back_to_synthetic() {
    let service =
        DiagnosisService::with_classifier(EngineConfig::default(), Arc::new(broken_classifier)).unwrap();
    let result = service.classify_image(&gray_png()).unwrap();
    assert!(result.is_mock);
    assert_eq!(result.provenance, Provenance::Synthetic);

    let baseline = synthetic_service().classify_image(&gray_png()).unwrap();
    assert_eq!(result.top_prediction.disease_class, baseline.top_prediction.disease_class);
    assert_eq!(result.top_prediction.confidence, baseline.top_prediction.confidence);
}

#[test]
fn failing_model_without_fallback_is_unavailable() {
    let mut config = EngineConfig::default();
    config.backend.fallback_to_synthetic = false;
    let service = DiagnosisService::with_classifier(config, Arc::new(broken_classifier)).unwrap();

    let err = service.classify_image(&gray_png()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClassificationUnavailable);
}

#[test]
fn service_rejects_inverted_confidence_bounds() {
    let mut config = EngineConfig::default();
    config.calibration.confidence_floor = 0.9;
    config.calibration.confidence_ceiling = 0.5;
    assert!(matches!(DiagnosisService::synthetic(config), Err(ConfigError::Invalid(_))));
}

#[test]
fn service_rejects_empty_top_k() {
    let mut config = EngineConfig::default();
    config.calibration.top_k = 0;
    assert!(matches!(
        DiagnosisService::with_classifier(config, Arc::new(low_confidence_classifier)),
        Err(ConfigError::Invalid(_))
    ));
}
