use std::io::{Cursor, Write};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::{ConversionConfig, TiffCompression};
use crate::image_pipeline::encode::writer::GrayImageWriter;
use crate::image_pipeline::grayscale::GrayImageData;

/// Writes 8-bit grayscale images.
///
/// TIFF goes through the `tiff` crate so compression and predictor can be
/// chosen, JPEG honours the configured quality, and every other format is
/// delegated to `image`.
#[derive(Default)]
pub struct StandardGrayWriter;

impl GrayImageWriter for StandardGrayWriter {
    fn write_gray(
        &self,
        image: &GrayImageData,
        format: ImageFormat,
        output: &mut dyn Write,
        config: &ConversionConfig,
    ) -> Result<()> {
        debug!(?format, "Encoding grayscale image: {}x{}", image.width, image.height);

        let width = image.width as u32;
        let height = image.height as u32;
        let mut buffer = Vec::new();

        match format {
            ImageFormat::Tiff => write_tiff(image, &mut buffer, config)?,
            ImageFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut buffer, config.jpeg_quality)
                    .write_image(&image.data, width, height, ExtendedColorType::L8)
                    .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
            }
            other => {
                image::write_buffer_with_format(
                    &mut Cursor::new(&mut buffer),
                    &image.data,
                    width,
                    height,
                    ExtendedColorType::L8,
                    other,
                )
                .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
            }
        }

        output.write_all(&buffer)?;

        debug!("Encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

fn write_tiff(image: &GrayImageData, buffer: &mut Vec<u8>, config: &ConversionConfig) -> Result<()> {
    let compression = match config.tiff_compression {
        TiffCompression::None => tiff::encoder::Compression::Uncompressed,
        TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
        TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
        TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
    };

    let mut encoder = tiff::encoder::TiffEncoder::new(Cursor::new(buffer))
        .map_err(|e| ConversionError::EncodeError(e.to_string()))?
        .with_compression(compression);

    if let Some(predictor_val) = config.predictor {
        let predictor = match predictor_val {
            2 => tiff::tags::Predictor::Horizontal,
            _ => tiff::tags::Predictor::None,
        };
        encoder = encoder.with_predictor(predictor);
    }

    encoder
        .write_image::<tiff::encoder::colortype::Gray8>(
            image.width as u32,
            image.height as u32,
            &image.data,
        )
        .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

    Ok(())
}
