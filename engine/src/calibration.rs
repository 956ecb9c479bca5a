use shared::{ConfidenceTier, DiseaseClass, PredictionRecord};

use crate::classifier::Classification;
use crate::config::CalibrationConfig;
use crate::knowledge::KnowledgeBase;

pub fn confidence_tier(confidence: f64) -> ConfidenceTier {
    if confidence > 0.8 {
        ConfidenceTier::High
    } else if confidence >= 0.6 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Registered classes ordered by weight, heaviest first. Equal weights keep
/// registration order.
pub fn rank_classes(classification: &Classification) -> Vec<(DiseaseClass, f64)> {
    let mut ranked: Vec<(DiseaseClass, f64)> = classification.probabilities.entries().collect();
    // sort_by is stable, so ties stay in registration order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

#[derive(Debug, Clone)]
pub struct Calibrator {
    config: CalibrationConfig,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Top confidence after the one clamp-and-widen step. Model-backed
    /// output carries no offset and is reported unchanged.
    pub fn top_confidence(&self, weight: f64, classification: &Classification) -> f64 {
        match classification.calibration_offset {
            // max/min rather than clamp: an unvalidated floor > ceiling must not panic
            Some(offset) => (weight + offset)
                .max(self.config.confidence_floor)
                .min(self.config.confidence_ceiling),
            None => weight,
        }
    }

    /// Top-K records, rank 1 first.
    pub fn rank(
        &self,
        classification: &Classification,
        knowledge: &KnowledgeBase,
    ) -> Vec<PredictionRecord> {
        rank_classes(classification)
            .into_iter()
            .take(self.config.top_k)
            .enumerate()
            .map(|(i, (disease_class, weight))| {
                let confidence = if i == 0 {
                    self.top_confidence(weight, classification)
                } else {
                    weight
                };
                let info = knowledge.entry(disease_class);
                PredictionRecord {
                    rank: i + 1,
                    disease_class,
                    disease_name: info.name.clone(),
                    confidence,
                    severity_tier: confidence_tier(confidence),
                    disease_severity: info.severity,
                }
            })
            .collect()
    }
}
