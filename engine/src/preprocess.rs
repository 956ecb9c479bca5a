use image::imageops::FilterType;
use ndarray::{Array3, Axis};
use sha2::{Digest, Sha256};
use shared::ImageSummary;

use crate::error::InferenceError;

pub const IMAGE_SIZE: u32 = 224;
pub const CHANNELS: usize = 3;

/// A decoded upload: the content hash of its bytes plus a fixed 224x224x3
/// grid with channel values in [0, 1].
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    content_hash: String,
    pixels: Array3<f32>,
    source_width: u32,
    source_height: u32,
}

impl NormalizedImage {
    /// Hex SHA-256 of the raw bytes.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn pixels(&self) -> &Array3<f32> {
        &self.pixels
    }

    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageStatistics {
    pub mean: f32,
    pub std_dev: f32,
    pub channel_means: [f32; CHANNELS],
}

impl ImageStatistics {
    pub fn from_pixels(pixels: &Array3<f32>) -> Self {
        let mut channel_means = [0.0; CHANNELS];
        for (c, slot) in channel_means.iter_mut().enumerate() {
            *slot = pixels.index_axis(Axis(2), c).mean().unwrap_or(0.0);
        }
        Self {
            mean: pixels.mean().unwrap_or(0.0),
            std_dev: pixels.std(0.0),
            channel_means,
        }
    }

    pub fn summary(&self, image: &NormalizedImage) -> ImageSummary {
        let (source_width, source_height) = image.source_dimensions();
        ImageSummary {
            mean: self.mean,
            std_dev: self.std_dev,
            channel_means: self.channel_means,
            source_width,
            source_height,
        }
    }
}

pub fn calculate_image_hash(image_data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image_data);
    hex::encode(hasher.finalize())
}

pub fn preprocess(
    image_data: &[u8],
    filter: FilterType,
) -> Result<(NormalizedImage, ImageStatistics), InferenceError> {
    if image_data.is_empty() {
        return Err(InferenceError::EmptyInput);
    }

    let decoded = image::load_from_memory(image_data).map_err(|e| {
        log::warn!("Failed to decode image ({} bytes): {}", image_data.len(), e);
        InferenceError::from(e)
    })?;
    let (source_width, source_height) = (decoded.width(), decoded.height());

    // to_rgb8 drops alpha and expands grayscale
    let rgb = decoded
        .resize_exact(IMAGE_SIZE, IMAGE_SIZE, filter)
        .to_rgb8();

    let data: Vec<f32> = rgb.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
    let side = IMAGE_SIZE as usize;
    let pixels = Array3::from_shape_vec((side, side, CHANNELS), data)
        .map_err(|e| InferenceError::InvalidImageFormat(e.to_string()))?;

    let stats = ImageStatistics::from_pixels(&pixels);
    log::debug!(
        "Preprocessed {}x{} image: mean={:.4} std={:.4}",
        source_width,
        source_height,
        stats.mean,
        stats.std_dev
    );

    let image = NormalizedImage {
        content_hash: calculate_image_hash(image_data),
        pixels,
        source_width,
        source_height,
    };
    Ok((image, stats))
}
