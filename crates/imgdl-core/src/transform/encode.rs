//! Encoders for the supported output formats.

use crate::error::TransformError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;

/// JPEG at `quality` (1-100). Alpha is dropped.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, TransformError> {
    let mut buf = Vec::new();
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        .map_err(TransformError::Encode)?;
    Ok(buf)
}

/// PNG is lossless; optimizing means best compression with adaptive filtering.
pub fn encode_png_best(img: &DynamicImage) -> Result<Vec<u8>, TransformError> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(TransformError::Encode)?;
    Ok(buf)
}

/// Lossy WebP at `quality` (0-100) through libwebp.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, TransformError> {
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    let memory = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| TransformError::WebpEncode(format!("{e:?}")))?;
    Ok(memory.to_vec())
}
