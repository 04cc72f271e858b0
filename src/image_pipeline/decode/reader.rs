use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::decode::types::RgbImageData;

pub trait ColorImageReader {
    fn read_rgb(&self, data: &[u8]) -> Result<RgbImageData>;
}
