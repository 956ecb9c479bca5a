pub mod batch;
pub mod calibration;
pub mod classifier;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod preprocess;
pub mod recommend;
pub mod service;

pub use classifier::{Backend, DiseaseClassifier, ModelBackend, SyntheticBackend};
pub use config::{ConfigError, EngineConfig};
pub use error::{ClassifierError, InferenceError};
pub use service::DiagnosisService;
