pub mod model;
pub mod synthetic;

use shared::{ClassProbability, DiseaseClass, Provenance};
use strum::EnumCount;

use crate::error::{ClassifierError, InferenceError};
use crate::preprocess::{ImageStatistics, NormalizedImage};

pub use model::{DiseaseClassifier, ModelBackend};
pub use synthetic::SyntheticBackend;

pub const CLASS_COUNT: usize = DiseaseClass::COUNT;

/// One weight per registered class, indexed by registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProbabilityVector {
    weights: [f64; CLASS_COUNT],
}

impl ClassProbabilityVector {
    /// Accepts raw classifier scores as-is once they are shaped like a
    /// distribution over the registered classes.
    pub fn from_scores(scores: &[f32]) -> Result<Self, ClassifierError> {
        if scores.len() != CLASS_COUNT {
            return Err(ClassifierError::ShapeMismatch {
                expected: CLASS_COUNT,
                actual: scores.len(),
            });
        }
        let mut weights = [0.0; CLASS_COUNT];
        for (i, score) in scores.iter().enumerate() {
            if !score.is_finite() || *score < 0.0 {
                return Err(ClassifierError::InvalidOutput(format!(
                    "score {} for {} is not a probability",
                    score,
                    class_at(i)
                )));
            }
            weights[i] = *score as f64;
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ClassifierError::InvalidOutput("scores sum to zero".into()));
        }
        Ok(Self { weights })
    }

    /// Rescales `raw` to sum to one while keeping every weight at or above
    /// `floor`. Weights that would drop under the floor are pinned to it and
    /// the remaining mass is shared proportionally among the rest.
    pub fn normalized_with_floor(raw: [f64; CLASS_COUNT], floor: f64) -> Self {
        let raw = raw.map(|w| if w.is_finite() { w.max(floor) } else { floor });
        let mut pinned = [false; CLASS_COUNT];

        loop {
            let pinned_count = pinned.iter().filter(|p| **p).count();
            let free_total: f64 = raw
                .iter()
                .zip(pinned.iter())
                .filter(|(_, p)| !**p)
                .map(|(w, _)| *w)
                .sum();
            if pinned_count == CLASS_COUNT || free_total <= 0.0 {
                return Self::uniform();
            }

            let scale = (1.0 - pinned_count as f64 * floor) / free_total;
            let mut changed = false;
            for i in 0..CLASS_COUNT {
                if !pinned[i] && raw[i] * scale < floor {
                    pinned[i] = true;
                    changed = true;
                }
            }

            if !changed {
                let mut weights = [0.0; CLASS_COUNT];
                for i in 0..CLASS_COUNT {
                    weights[i] = if pinned[i] { floor } else { raw[i] * scale };
                }
                return Self { weights };
            }
        }
    }

    pub fn uniform() -> Self {
        Self {
            weights: [1.0 / CLASS_COUNT as f64; CLASS_COUNT],
        }
    }

    pub fn weight(&self, class: DiseaseClass) -> f64 {
        self.weights[class.index()]
    }

    pub fn weights(&self) -> &[f64; CLASS_COUNT] {
        &self.weights
    }

    pub fn entries(&self) -> impl Iterator<Item = (DiseaseClass, f64)> + '_ {
        DiseaseClass::registered().zip(self.weights.iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn to_class_probabilities(&self) -> Vec<ClassProbability> {
        self.entries()
            .map(|(disease_class, probability)| ClassProbability {
                disease_class,
                probability,
            })
            .collect()
    }
}

fn class_at(index: usize) -> String {
    DiseaseClass::from_index(index)
        .map(|c| c.to_string())
        .unwrap_or_else(|| format!("class_{}", index))
}

/// Output of a backend: the distribution plus how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub probabilities: ClassProbabilityVector,
    pub provenance: Provenance,
    pub model_version: String,
    /// Seeded widening for the top confidence. Only synthetic output has one.
    pub calibration_offset: Option<f64>,
}

impl Classification {
    pub fn is_mock(&self) -> bool {
        self.provenance == Provenance::Synthetic
    }
}

pub enum Backend {
    Model(ModelBackend),
    Synthetic(SyntheticBackend),
}

impl Backend {
    pub fn classify(
        &self,
        image: &NormalizedImage,
        stats: &ImageStatistics,
    ) -> Result<Classification, InferenceError> {
        match self {
            Backend::Model(backend) => backend.classify(image),
            Backend::Synthetic(backend) => Ok(backend.classify(image, stats)),
        }
    }

    pub fn model_version(&self) -> &str {
        match self {
            Backend::Model(backend) => backend.version(),
            Backend::Synthetic(_) => synthetic::MODEL_VERSION,
        }
    }

    pub fn provenance(&self) -> Provenance {
        match self {
            Backend::Model(_) => Provenance::Model,
            Backend::Synthetic(_) => Provenance::Synthetic,
        }
    }
}

impl From<ModelBackend> for Backend {
    fn from(backend: ModelBackend) -> Self {
        Backend::Model(backend)
    }
}

impl From<SyntheticBackend> for Backend {
    fn from(backend: SyntheticBackend) -> Self {
        Backend::Synthetic(backend)
    }
}
