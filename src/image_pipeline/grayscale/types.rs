//! Grayscale image types

/// Single-channel 8-bit image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Luma values, row-major, one byte per pixel
    pub data: Vec<u8>,
}

impl GrayImageData {
    pub const CHANNELS: usize = 1;
}
