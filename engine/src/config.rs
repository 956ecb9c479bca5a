use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub image: ImageConfig,
    pub calibration: CalibrationConfig,
    pub recommendation: RecommendationConfig,
    pub backend: BackendConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub resize_method: ResizeMethod,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMethod {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeMethod {
    pub fn filter(self) -> FilterType {
        match self {
            ResizeMethod::Nearest => FilterType::Nearest,
            ResizeMethod::Triangle => FilterType::Triangle,
            ResizeMethod::CatmullRom => FilterType::CatmullRom,
            ResizeMethod::Gaussian => FilterType::Gaussian,
            ResizeMethod::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub top_k: usize,
    pub confidence_floor: f64,
    pub confidence_ceiling: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            confidence_floor: 0.6,
            confidence_ceiling: 0.95,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub low_confidence_threshold: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub fallback_to_synthetic: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            fallback_to_synthetic: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub parallel_threshold: usize,
    pub max_workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 4,
            max_workers: 4,
        }
    }
}

impl EngineConfig {
    /// Loads the bundled `config/engine.yaml` at the workspace root.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_path(&default_config_path())
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(config_str: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let calibration = &self.calibration;
        if calibration.top_k == 0 {
            return Err(ConfigError::Invalid("calibration.top_k must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&calibration.confidence_floor)
            || !(0.0..=1.0).contains(&calibration.confidence_ceiling)
            || calibration.confidence_floor > calibration.confidence_ceiling
        {
            return Err(ConfigError::Invalid(format!(
                "confidence bounds [{}, {}] must satisfy 0 <= floor <= ceiling <= 1",
                calibration.confidence_floor, calibration.confidence_ceiling
            )));
        }
        if self.batch.max_workers == 0 {
            return Err(ConfigError::Invalid("batch.max_workers must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_config_path() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(format!("{}/../config/engine.yaml", manifest_dir))
}
