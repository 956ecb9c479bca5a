use ndarray::Array3;
use shared::Provenance;
use std::sync::Arc;

use super::{ClassProbabilityVector, Classification};
use crate::error::{ClassifierError, InferenceError};
use crate::preprocess::NormalizedImage;

/// A trained classifier supplied by the caller. `predict` receives the
/// normalized 224x224x3 grid and returns one score per registered class, in
/// registration order.
pub trait DiseaseClassifier: Send + Sync {
    fn predict(&self, pixels: &Array3<f32>) -> Result<Vec<f32>, ClassifierError>;

    fn version(&self) -> &str {
        "external"
    }
}

impl<F> DiseaseClassifier for F
where
    F: Fn(&Array3<f32>) -> Result<Vec<f32>, ClassifierError> + Send + Sync,
{
    fn predict(&self, pixels: &Array3<f32>) -> Result<Vec<f32>, ClassifierError> {
        self(pixels)
    }
}

#[derive(Clone)]
pub struct ModelBackend {
    classifier: Arc<dyn DiseaseClassifier>,
}

impl ModelBackend {
    pub fn new(classifier: Arc<dyn DiseaseClassifier>) -> Self {
        Self { classifier }
    }

    pub fn version(&self) -> &str {
        self.classifier.version()
    }

    pub fn classify(&self, image: &NormalizedImage) -> Result<Classification, InferenceError> {
        let scores = self.classifier.predict(image.pixels())?;
        let probabilities = ClassProbabilityVector::from_scores(&scores)?;
        Ok(Classification {
            probabilities,
            provenance: Provenance::Model,
            model_version: self.classifier.version().to_string(),
            calibration_offset: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::preprocess;
    use image::imageops::FilterType;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    struct Fixed(Vec<f32>);

    impl DiseaseClassifier for Fixed {
        fn predict(&self, pixels: &Array3<f32>) -> Result<Vec<f32>, ClassifierError> {
            assert_eq!(pixels.shape(), &[224, 224, 3]);
            Ok(self.0.clone())
        }

        fn version(&self) -> &str {
            "fixed-test"
        }
    }

    fn sample_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([10, 200, 30])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn forwards_classifier_scores() {
        let bytes = sample_png();
        let (image, _) = preprocess(&bytes, FilterType::Triangle).unwrap();
        let backend = ModelBackend::new(Arc::new(Fixed(vec![0.1, 0.6, 0.1, 0.1, 0.05, 0.05])));

        let classification = backend.classify(&image).unwrap();
        assert_eq!(classification.provenance, Provenance::Model);
        assert_eq!(classification.model_version, "fixed-test");
        assert!(classification.calibration_offset.is_none());
        assert!(!classification.is_mock());
    }

    #[test]
    fn closure_classifier_errors_surface_as_unavailable() {
        let bytes = sample_png();
        let (image, _) = preprocess(&bytes, FilterType::Triangle).unwrap();
        let classifier = |_: &Array3<f32>| -> Result<Vec<f32>, ClassifierError> {
            Err(ClassifierError::Unavailable)
        };
        let backend = ModelBackend::new(Arc::new(classifier));

        assert!(matches!(
            backend.classify(&image),
            Err(InferenceError::ClassificationUnavailable(_))
        ));
    }
}
