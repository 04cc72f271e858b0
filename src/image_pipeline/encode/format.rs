use std::path::Path;

use image::ImageFormat;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Output container format implied by the extension of `path`.
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_path(path)
        .map_err(|e| ConversionError::UnsupportedFormat(format!("{}: {}", path.display(), e)))
}
