use image::{ImageFormat, ImageReader};

use crate::error::{Result, SnaptextError};

/// Largest accepted upload. A buffer of exactly this size passes.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Smallest accepted width and height.
pub const MIN_DIMENSION_PX: u32 = 50;

const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// What the validator learned about an accepted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetails {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub file_size: usize,
}

fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Png => "PNG",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::WebP => "WebP",
        _ => "unknown",
    }
}

/// Validate an uploaded buffer before any OCR attempt.
///
/// Rules are applied in order and the first failure wins:
/// 1. the bytes must be one of JPEG, PNG, BMP, TIFF, WebP
/// 2. the buffer must not exceed [`MAX_IMAGE_BYTES`]
/// 3. width and height must both be at least [`MIN_DIMENSION_PX`]
///
/// Pure function of the input; dimensions are read from the image header
/// without a full decode.
pub fn validate_image(bytes: &[u8]) -> Result<ImageDetails> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SnaptextError::Validation(format!("Invalid image file: {e}")))?;

    let format = reader.format().ok_or_else(|| {
        SnaptextError::Validation(
            "Unsupported image format. Supported formats: JPEG, PNG, BMP, TIFF, WebP".to_string(),
        )
    })?;

    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(SnaptextError::Validation(format!(
            "Unsupported image format: {}. Supported formats: JPEG, PNG, BMP, TIFF, WebP",
            format_name(format)
        )));
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(SnaptextError::Validation(
            "Image size too large. Maximum size allowed is 20MB.".to_string(),
        ));
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| SnaptextError::Validation(format!("Invalid image file: {e}")))?;

    if width < MIN_DIMENSION_PX || height < MIN_DIMENSION_PX {
        return Err(SnaptextError::Validation(format!(
            "Image too small: {width}x{height}. Minimum dimensions: {MIN_DIMENSION_PX}x{MIN_DIMENSION_PX} pixels."
        )));
    }

    Ok(ImageDetails {
        format,
        width,
        height,
        file_size: bytes.len(),
    })
}
