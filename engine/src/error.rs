use shared::{ErrorKind, ErrorRecord};

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Classification unavailable: {0}")]
    ClassificationUnavailable(String),
    #[error("Empty input")]
    EmptyInput,
}

/// Failures reported by an externally supplied classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Classifier is not loaded")]
    Unavailable,
    #[error("Expected {expected} class scores, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Invalid classifier output: {0}")]
    InvalidOutput(String),
}

impl From<ClassifierError> for InferenceError {
    fn from(err: ClassifierError) -> Self {
        InferenceError::ClassificationUnavailable(err.to_string())
    }
}

impl From<image::ImageError> for InferenceError {
    fn from(err: image::ImageError) -> Self {
        InferenceError::InvalidImageFormat(err.to_string())
    }
}

impl InferenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InferenceError::InvalidImageFormat(_) => ErrorKind::InvalidImageFormat,
            InferenceError::UnsupportedFileType(_) => ErrorKind::UnsupportedFileType,
            InferenceError::ClassificationUnavailable(_) => ErrorKind::ClassificationUnavailable,
            InferenceError::EmptyInput => ErrorKind::EmptyInput,
        }
    }

    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<&InferenceError> for ErrorRecord {
    fn from(err: &InferenceError) -> Self {
        err.to_record()
    }
}
