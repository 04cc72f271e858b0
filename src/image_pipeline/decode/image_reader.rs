//! Reader for the raster formats handled by the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::decode::reader::ColorImageReader;
use crate::image_pipeline::decode::types::RgbImageData;

/// Decodes JPEG, PNG, TIFF, BMP and the other formats enabled in `image`.
///
/// Grayscale inputs come back with the luma value replicated across the three
/// channels, alpha is discarded and 16-bit samples are reduced to 8 bits.
/// An EXIF orientation tag is applied, so the pixels come back upright.
#[derive(Default)]
pub struct ImageCrateReader;

impl ColorImageReader for ImageCrateReader {
    fn read_rgb(&self, data: &[u8]) -> Result<RgbImageData> {
        debug!("Decoding image, {} bytes", data.len());

        let decode_err = |e: image::ImageError| ConversionError::DecodeError(e.to_string());

        let mut decoder = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?
            .into_decoder()
            .map_err(decode_err)?;
        let orientation = decoder.orientation().map_err(decode_err)?;

        let mut decoded = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
        decoded.apply_orientation(orientation);

        debug!(
            color = ?decoded.color(),
            ?orientation,
            "Decoded image: {}x{}",
            decoded.width(),
            decoded.height()
        );

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        Ok(RgbImageData {
            width: width as usize,
            height: height as usize,
            data: rgb.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(image: image::DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_reads_rgb_png() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(1, 0, Rgb([40, 50, 60]));

        let decoded = ImageCrateReader
            .read_rgb(&encode_png(img.into()))
            .unwrap();

        assert_eq!((decoded.width, decoded.height), (2, 1));
        assert_eq!(decoded.data, vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_gray_input_is_replicated() {
        let img = GrayImage::from_pixel(1, 1, Luma([77]));

        let decoded = ImageCrateReader
            .read_rgb(&encode_png(img.into()))
            .unwrap();

        assert_eq!(decoded.data, vec![77, 77, 77]);
    }

    /// JPEG with an APP1 Exif segment carrying the given Orientation value.
    fn jpeg_with_orientation(img: RgbImage, orientation: u8) -> Vec<u8> {
        let mut jpeg = Vec::new();
        image::DynamicImage::from(img)
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();

        let mut exif = b"Exif\0\0".to_vec();
        // Big-endian TIFF header, first IFD at offset 8
        exif.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
        // One entry: tag 0x0112 (Orientation), SHORT, count 1
        exif.extend_from_slice(&[0x00, 0x01]);
        exif.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        exif.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
        exif.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let segment_len = (exif.len() + 2) as u16;
        let mut segment = vec![0xFF, 0xE1];
        segment.extend_from_slice(&segment_len.to_be_bytes());
        segment.extend_from_slice(&exif);

        // Right after SOI
        jpeg.splice(2..2, segment);
        jpeg
    }

    #[test]
    fn test_exif_rotation_is_applied() {
        let img = RgbImage::from_pixel(4, 2, Rgb([120, 120, 120]));

        let decoded = ImageCrateReader
            .read_rgb(&jpeg_with_orientation(img, 6))
            .unwrap();

        assert_eq!((decoded.width, decoded.height), (2, 4));
        assert_eq!(decoded.data.len(), 2 * 4 * 3);
    }

    #[test]
    fn test_exif_upright_keeps_dimensions() {
        let img = RgbImage::from_pixel(4, 2, Rgb([120, 120, 120]));

        let decoded = ImageCrateReader
            .read_rgb(&jpeg_with_orientation(img, 1))
            .unwrap();

        assert_eq!((decoded.width, decoded.height), (4, 2));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = ImageCrateReader.read_rgb(b"definitely not an image");
        assert!(matches!(result, Err(ConversionError::DecodeError(_))));
    }
}
