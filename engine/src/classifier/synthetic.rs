//! Hash-seeded stand-in used when no trained classifier is installed.
//!
//! Output is a pure function of the image statistics and the content hash,
//! so identical uploads always yield identical diagnoses.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shared::{DiseaseClass, Provenance};

use super::{CLASS_COUNT, ClassProbabilityVector, Classification};
use crate::preprocess::{ImageStatistics, NormalizedImage};

pub const MODEL_VERSION: &str = "synthetic-v1";
pub const WEIGHT_FLOOR: f64 = 0.01;

const NOISE_AMPLITUDE: f64 = 0.1;
const OFFSET_MIN: f64 = -0.1;
const OFFSET_MAX: f64 = 0.2;
const SEED_MODULUS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrightnessBand {
    Dark,
    Balanced,
    Bright,
}

impl BrightnessBand {
    pub fn from_mean(mean: f32) -> Self {
        if mean < 0.3 {
            BrightnessBand::Dark
        } else if mean > 0.7 {
            BrightnessBand::Bright
        } else {
            BrightnessBand::Balanced
        }
    }

    /// Base weight before noise. Dark frames lean toward the wet-lesion
    /// diseases, bright ones toward healthy foliage.
    pub fn prior(self, class: DiseaseClass) -> f64 {
        use DiseaseClass::*;
        match (self, class) {
            (BrightnessBand::Dark, Healthy) => 0.1,
            (BrightnessBand::Dark, BacterialBlight) => 0.3,
            (BrightnessBand::Dark, BrownSpot) => 0.4,
            (BrightnessBand::Dark, LeafBlast) => 0.2,
            (BrightnessBand::Dark, TungroVirus | BacterialLeafStreak) => 0.0,
            (BrightnessBand::Bright, Healthy) => 0.6,
            (BrightnessBand::Bright, BacterialLeafStreak) => 0.0,
            (BrightnessBand::Bright, _) => 0.1,
            (BrightnessBand::Balanced, TungroVirus | BacterialLeafStreak) => 0.1,
            (BrightnessBand::Balanced, _) => 0.2,
        }
    }
}

/// First eight hex digits of the content hash, reduced modulo 1000.
pub fn seed_from_hash(content_hash: &str) -> u64 {
    let prefix = content_hash.get(..8).unwrap_or(content_hash);
    match u32::from_str_radix(prefix, 16) {
        Ok(value) => (value % SEED_MODULUS) as u64,
        Err(_) => {
            log::warn!("Content hash {:?} is not hex, seeding with 0", content_hash);
            0
        }
    }
}

/// ChaCha8 output is stable across rand releases, unlike `StdRng`.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticBackend;

impl SyntheticBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, image: &NormalizedImage, stats: &ImageStatistics) -> Classification {
        Self::distribution(stats, image.content_hash())
    }

    pub fn distribution(stats: &ImageStatistics, content_hash: &str) -> Classification {
        let seed = seed_from_hash(content_hash);
        let mut rng = seeded_rng(seed);
        let band = BrightnessBand::from_mean(stats.mean);

        let mut raw = [0.0; CLASS_COUNT];
        for class in DiseaseClass::registered() {
            let noise = rng.random_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE);
            raw[class.index()] = band.prior(class) + noise;
        }
        let probabilities = ClassProbabilityVector::normalized_with_floor(raw, WEIGHT_FLOOR);

        // drawn after the noise so it comes from the same stream
        let offset = rng.random_range(OFFSET_MIN..=OFFSET_MAX);

        log::debug!(
            "Synthetic distribution seed={} band={:?} weights={:?}",
            seed,
            band,
            probabilities.weights()
        );

        Classification {
            probabilities,
            provenance: Provenance::Synthetic,
            model_version: MODEL_VERSION.to_string(),
            calibration_offset: Some(offset),
        }
    }
}
