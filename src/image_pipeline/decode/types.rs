//! Decoded color image types

/// Decoded 8-bit color image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u8>,
}

impl RgbImageData {
    pub const CHANNELS: usize = 3;

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}
