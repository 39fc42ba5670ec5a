//! Image transcoding.
//!
//! Decodes raw bytes and re-encodes them according to the batch flags:
//! WebP conversion (quality 80 when optimizing, 100 otherwise) or in-format
//! optimization for JPEG and PNG. Anything else passes through untouched.

mod encode;

use crate::error::TransformError;
use image::ImageFormat;

pub use encode::{encode_jpeg, encode_png_best, encode_webp};

/// Quality used whenever `optimize` is set.
pub const OPTIMIZED_QUALITY: u8 = 80;
/// WebP quality when converting without optimization.
pub const FULL_QUALITY: u8 = 100;

pub const WEBP_EXTENSION: &str = ".webp";

/// Bytes and extension (with leading dot) after the transform stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// Applies the requested transform. `current_extension` is the extension
/// derived from the source URL (e.g. `.png`) and is kept unless converting
/// to WebP. Optimize-only re-encoding goes by the format sniffed from the
/// bytes, so a `.jpg` URL serving PNG is re-encoded as PNG.
pub fn transform(
    raw: Vec<u8>,
    convert_to_webp: bool,
    optimize: bool,
    current_extension: &str,
) -> Result<Transformed, TransformError> {
    if convert_to_webp {
        let img = image::load_from_memory(&raw).map_err(TransformError::Decode)?;
        let quality = if optimize {
            OPTIMIZED_QUALITY
        } else {
            FULL_QUALITY
        };
        let bytes = encode_webp(&img, quality)?;
        tracing::debug!(quality, in_len = raw.len(), out_len = bytes.len(), "converted to webp");
        return Ok(Transformed {
            bytes,
            extension: WEBP_EXTENSION.to_string(),
        });
    }

    if optimize {
        match image::guess_format(&raw) {
            Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => {
                let img = image::load_from_memory_with_format(&raw, format)
                    .map_err(TransformError::Decode)?;
                let bytes = match format {
                    ImageFormat::Jpeg => encode_jpeg(&img, OPTIMIZED_QUALITY)?,
                    _ => encode_png_best(&img)?,
                };
                tracing::debug!(?format, in_len = raw.len(), out_len = bytes.len(), "optimized");
                return Ok(Transformed {
                    bytes,
                    extension: current_extension.to_string(),
                });
            }
            Ok(format) => {
                tracing::debug!(?format, "optimize skipped for format");
            }
            // Unrecognized content under a JPEG/PNG name is corrupt, not a foreign format.
            Err(err) if claims_optimizable(current_extension) => {
                return Err(TransformError::Decode(err));
            }
            Err(_) => {
                tracing::debug!(extension = current_extension, "optimize skipped, unknown content");
            }
        }
    }

    Ok(Transformed {
        bytes: raw,
        extension: current_extension.to_string(),
    })
}

/// Whether the extension (case-insensitive) names JPEG or PNG.
fn claims_optimizable(extension: &str) -> bool {
    matches!(
        ImageFormat::from_extension(extension.trim_start_matches('.')),
        Some(ImageFormat::Jpeg | ImageFormat::Png)
    )
}
