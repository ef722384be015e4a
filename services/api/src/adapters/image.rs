//! services/api/src/adapters/image.rs
//!
//! Implements the `ImagePreprocessor` port: uploaded answer photos are
//! shrunk to fit 1920px and re-encoded as JPEG before being sent to the
//! vision model. Failure is non-fatal; the original bytes are used instead.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use quiz_core::ports::ImagePreprocessor;
use std::io::Cursor;
use tracing::warn;

const MAX_DIMENSION: u32 = 1920;

/// Shrink-and-re-encode preprocessor.
pub struct JpegPreprocessor;

impl JpegPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JpegPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

fn shrink(bytes: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = if decoded.width() > MAX_DIMENSION || decoded.height() > MAX_DIMENSION {
        decoded.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
    } else {
        decoded
    };
    // JPEG has no alpha channel; flatten before encoding.
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}

impl ImagePreprocessor for JpegPreprocessor {
    fn compress(&self, image: &[u8]) -> Vec<u8> {
        match shrink(image) {
            Ok(compressed) => compressed,
            Err(e) => {
                warn!("Image preprocessing failed, using original upload: {}", e);
                image.to_vec()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_image_is_shrunk_to_fit() {
        let big = DynamicImage::ImageRgb8(image::RgbImage::new(2400, 1200));
        let mut bytes = Cursor::new(Vec::new());
        big.write_to(&mut bytes, ImageFormat::Png).unwrap();

        let compressed = JpegPreprocessor::new().compress(&bytes.into_inner());
        let reloaded = image::load_from_memory(&compressed).unwrap();
        assert!(reloaded.width() <= MAX_DIMENSION);
        assert!(reloaded.height() <= MAX_DIMENSION);
    }

    #[test]
    fn garbage_bytes_pass_through_unchanged() {
        let garbage = b"definitely not an image".to_vec();
        assert_eq!(JpegPreprocessor::new().compress(&garbage), garbage);
    }
}
