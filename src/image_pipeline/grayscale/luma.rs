use tracing::debug;

use crate::image_pipeline::decode::RgbImageData;
use crate::image_pipeline::grayscale::types::GrayImageData;

/// Fixed-point precision of the luma weights.
const LUMA_SHIFT: u32 = 14;
const LUMA_ROUND: u32 = 1 << (LUMA_SHIFT - 1);

// 0.299, 0.587 and 0.114 scaled by 2^14. They sum to exactly 2^14.
const WEIGHT_R: u32 = 4899;
const WEIGHT_G: u32 = 9617;
const WEIGHT_B: u32 = 1868;

/// Luma of a single RGB pixel, `round(0.299 R + 0.587 G + 0.114 B)`.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = WEIGHT_R * r as u32 + WEIGHT_G * g as u32 + WEIGHT_B * b as u32;
    ((weighted + LUMA_ROUND) >> LUMA_SHIFT) as u8
}

/// Collapses an RGB image to one luma channel with the same dimensions.
pub fn to_luma(image: &RgbImageData) -> GrayImageData {
    debug!("Converting {}x{} RGB image to luma", image.width, image.height);

    let data = image
        .data
        .chunks_exact(RgbImageData::CHANNELS)
        .take(image.pixel_count())
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();

    GrayImageData {
        width: image.width,
        height: image.height,
        data,
    }
}
