use chrono::Utc;
use shared::{
    BatchResult, DiseaseInfo, DiseaseSummary, PredictionResult, RecommendationPlan,
};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::batch::BatchCoordinator;
use crate::calibration::Calibrator;
use crate::classifier::{Backend, Classification, DiseaseClassifier, ModelBackend, SyntheticBackend};
use crate::config::{ConfigError, EngineConfig};
use crate::error::InferenceError;
use crate::knowledge::KnowledgeBase;
use crate::preprocess::{ImageStatistics, NormalizedImage, preprocess};
use crate::recommend::Recommender;

/// Built once at startup and shared read-only by every caller.
pub struct DiagnosisService {
    config: EngineConfig,
    backend: Backend,
    fallback: SyntheticBackend,
    knowledge: KnowledgeBase,
    calibrator: Calibrator,
    recommender: Recommender,
    batch: BatchCoordinator,
}

impl DiagnosisService {
    /// Rejects configs that `EngineConfig::validate` refuses, since the
    /// fields are public and may not have come through a loader.
    pub fn new(config: EngineConfig, backend: Backend) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "Diagnosis service ready: backend={}, model_version={}, classes={}",
            backend.provenance(),
            backend.model_version(),
            crate::classifier::CLASS_COUNT
        );
        Ok(Self {
            calibrator: Calibrator::new(config.calibration.clone()),
            recommender: Recommender::new(config.recommendation.clone()),
            batch: BatchCoordinator::new(&config.batch),
            knowledge: KnowledgeBase::new(),
            fallback: SyntheticBackend::new(),
            backend,
            config,
        })
    }

    pub fn synthetic(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::new(config, SyntheticBackend::new().into())
    }

    pub fn with_classifier(
        config: EngineConfig,
        classifier: Arc<dyn DiseaseClassifier>,
    ) -> Result<Self, ConfigError> {
        Self::new(config, ModelBackend::new(classifier).into())
    }

    pub fn classify_image(&self, image_data: &[u8]) -> Result<PredictionResult, InferenceError> {
        let started = Instant::now();
        let (image, stats) = preprocess(image_data, self.config.image.resize_method.filter())?;
        let classification = self.run_backend(&image, &stats)?;

        let top_predictions = self.calibrator.rank(&classification, &self.knowledge);
        let top_prediction = top_predictions.first().cloned().ok_or_else(|| {
            InferenceError::ClassificationUnavailable("no classes were ranked".into())
        })?;

        let is_healthy = top_prediction.disease_class.is_healthy();
        let disease_info = self.knowledge.entry(top_prediction.disease_class).clone();
        let recommendation = self.recommender.recommend(&disease_info, top_prediction.confidence);

        log::info!(
            "Disease detected: {} (confidence: {:.3}, provenance: {})",
            top_prediction.disease_class,
            top_prediction.confidence,
            classification.provenance
        );

        Ok(PredictionResult {
            id: Uuid::new_v4(),
            top_prediction,
            top_predictions,
            all_predictions: classification.probabilities.to_class_probabilities(),
            disease_info,
            recommendation,
            is_healthy,
            is_mock: classification.is_mock(),
            provenance: classification.provenance,
            model_version: classification.model_version,
            image_hash: image.content_hash().to_string(),
            statistics: stats.summary(&image),
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            timestamp: Utc::now(),
        })
    }

    pub fn describe_disease(&self, class_id: &str) -> DiseaseInfo {
        self.knowledge.describe(class_id)
    }

    pub fn list_known_diseases(&self) -> Vec<DiseaseSummary> {
        self.knowledge.list()
    }

    pub fn recommend_treatment(&self, class_id: &str, confidence: f64) -> RecommendationPlan {
        let info = self.knowledge.describe(class_id);
        self.recommender.recommend(&info, confidence)
    }

    pub fn classify_batch<T>(&self, images: &[T]) -> BatchResult
    where
        T: AsRef<[u8]> + Sync,
    {
        self.batch.run(images, |bytes| self.classify_image(bytes))
    }

    fn run_backend(
        &self,
        image: &NormalizedImage,
        stats: &ImageStatistics,
    ) -> Result<Classification, InferenceError> {
        match self.backend.classify(image, stats) {
            Ok(classification) => Ok(classification),
            Err(e) if self.config.backend.fallback_to_synthetic && matches!(self.backend, Backend::Model(_)) => {
                log::warn!("Model classifier failed, using synthetic backend: {}", e);
                Ok(self.fallback.classify(image, stats))
            }
            Err(e) => Err(e),
        }
    }
}
