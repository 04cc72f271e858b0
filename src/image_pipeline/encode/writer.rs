use std::io::Write;

use image::ImageFormat;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::encode::types::ConversionConfig;
use crate::image_pipeline::grayscale::GrayImageData;

pub trait GrayImageWriter {
    fn write_gray(
        &self,
        image: &GrayImageData,
        format: ImageFormat,
        output: &mut dyn Write,
        config: &ConversionConfig,
    ) -> Result<()>;
}
