#![allow(dead_code)]

use engine::{DiagnosisService, EngineConfig};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub fn encode_png(image: DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    encode_png(DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb))))
}

/// Diagonal gradient, so different sizes and offsets give different bytes.
pub fn gradient_png(width: u32, height: u32, offset: u8) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        let v = ((x + y) as u8).wrapping_add(offset);
        Rgb([v / 2, v, v / 3])
    });
    encode_png(DynamicImage::ImageRgb8(image))
}

pub fn gray_png() -> Vec<u8> {
    solid_png(32, 32, [128, 128, 128])
}

pub fn synthetic_service() -> DiagnosisService {
    DiagnosisService::synthetic(EngineConfig::default()).expect("default config is valid")
}
