use image::ImageFormat;
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::decode::image_reader::ImageCrateReader;
use crate::image_pipeline::decode::rawloader_reader::RawLoaderReader;
use crate::image_pipeline::decode::reader::ColorImageReader;
use crate::image_pipeline::decode::types::RgbImageData;

/// Picks a decoder from the leading bytes of the input.
///
/// Most camera RAW formats are TIFF containers, so TIFF data is offered to
/// rawloader first and handed to the `image` crate when rawloader does not
/// recognize the camera. Data with no known signature goes to rawloader only.
#[derive(Default)]
pub struct AutoReader {
    image: ImageCrateReader,
    raw: RawLoaderReader,
}

impl ColorImageReader for AutoReader {
    fn read_rgb(&self, data: &[u8]) -> Result<RgbImageData> {
        match image::guess_format(data) {
            Ok(ImageFormat::Tiff) => {
                debug!("TIFF container, trying RAW decoder first");
                self.raw.read_rgb(data).or_else(|raw_err| {
                    debug!("Not a camera RAW file ({}), decoding as TIFF", raw_err);
                    self.image.read_rgb(data)
                })
            }
            Ok(format) => {
                debug!(?format, "Detected raster format");
                self.image.read_rgb(data)
            }
            Err(_) => {
                debug!("No raster signature found, trying RAW decoder");
                self.raw.read_rgb(data)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::ErrorKind;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(3, 2, Rgb([200, 100, 50]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_png_goes_through_image_crate() {
        let decoded = AutoReader::default().read_rgb(&encode(ImageFormat::Png)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(&decoded.data[..3], &[200, 100, 50]);
    }

    #[test]
    fn test_plain_tiff_falls_back_to_image_crate() {
        let decoded = AutoReader::default().read_rgb(&encode(ImageFormat::Tiff)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.data.len(), 3 * 2 * 3);
    }

    #[test]
    fn test_unknown_bytes_are_decode_error() {
        let result = AutoReader::default().read_rgb(&[0u8; 64]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::DecodeError);
    }
}
