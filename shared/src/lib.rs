use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};
use uuid::Uuid;

/// Registered disease classes. Declaration order is the registration order:
/// probability vectors are indexed by it and ranking ties fall back to it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
    EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiseaseClass {
    Healthy,
    BacterialBlight,
    BrownSpot,
    LeafBlast,
    TungroVirus,
    BacterialLeafStreak,
}

impl DiseaseClass {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn registered() -> impl Iterator<Item = DiseaseClass> {
        Self::iter()
    }

    pub fn is_healthy(self) -> bool {
        matches!(self, DiseaseClass::Healthy)
    }
}

/// Intrinsic danger rating of a disease, as curated in the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum DiseaseSeverity {
    Critical,
    High,
    Medium,
    Low,
    None,
    Unknown,
}

/// Bucket derived from prediction confidence. Not to be confused with
/// [`DiseaseSeverity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Urgency {
    Immediate,
    Urgent,
    Moderate,
    Routine,
    Preventive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Provenance {
    Model,
    Synthetic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassProbability {
    pub disease_class: DiseaseClass,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    pub rank: usize,
    pub disease_class: DiseaseClass,
    pub disease_name: String,
    pub confidence: f64,
    pub severity_tier: ConfidenceTier,
    pub disease_severity: DiseaseSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageSummary {
    pub mean: f32,
    pub std_dev: f32,
    pub channel_means: [f32; 3],
    pub source_width: u32,
    pub source_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseInfo {
    pub class_id: String,
    pub name: String,
    pub severity: DiseaseSeverity,
    pub description: String,
    pub symptoms: Vec<String>,
    pub treatment: Vec<String>,
    pub prevention: Vec<String>,
    pub recovery_time: String,
    pub cost_per_hectare: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseSummary {
    pub class_id: DiseaseClass,
    pub display_name: String,
    pub severity: DiseaseSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationPlan {
    pub disease: String,
    pub urgency: Urgency,
    pub immediate_actions: Vec<String>,
    pub prevention_measures: Vec<String>,
    pub timeline: String,
    pub monitoring_schedule: String,
    pub guidance: Vec<String>,
    pub additional_resources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub id: Uuid,
    pub top_prediction: PredictionRecord,
    pub top_predictions: Vec<PredictionRecord>,
    pub all_predictions: Vec<ClassProbability>,
    pub disease_info: DiseaseInfo,
    pub recommendation: RecommendationPlan,
    pub is_healthy: bool,
    pub is_mock: bool,
    pub provenance: Provenance,
    pub model_version: String,
    pub image_hash: String,
    pub statistics: ImageSummary,
    pub processing_time_ms: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    InvalidImageFormat,
    UnsupportedFileType,
    ClassificationUnavailable,
    EmptyInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Prediction(Box<PredictionResult>),
    Error(ErrorRecord),
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Prediction(_))
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        match self {
            BatchOutcome::Prediction(result) => Some(result),
            BatchOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            BatchOutcome::Prediction(_) => None,
            BatchOutcome::Error(record) => Some(record),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: usize,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub items: Vec<BatchItem>,
    pub total_images: usize,
    pub processed_images: usize,
    pub failed_images: usize,
    pub timestamp: DateTime<Utc>,
}

impl BatchResult {
    pub fn from_items(items: Vec<BatchItem>) -> Self {
        let processed_images = items.iter().filter(|item| item.outcome.is_success()).count();
        Self {
            total_images: items.len(),
            processed_images,
            failed_images: items.len() - processed_images,
            items,
            timestamp: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
