use std::io::Write;
use std::path::Path;

use image::ImageFormat;
use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    decode::{AutoReader, ColorImageReader, RgbImageData},
    encode::{output_format, ConversionConfig, GrayImageWriter, StandardGrayWriter},
    grayscale::{to_luma, GrayImageData},
};

pub struct GrayscalePipeline<R: ColorImageReader, W: GrayImageWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl GrayscalePipeline<AutoReader, StandardGrayWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: AutoReader::default(),
            writer: StandardGrayWriter,
            config,
        }
    }
}

impl<R: ColorImageReader, W: GrayImageWriter> GrayscalePipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, image: &RgbImageData) -> Result<()> {
        let (width, height) = (image.width, image.height);
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        let expected = image.pixel_count() * RgbImageData::CHANNELS;
        if image.data.len() != expected {
            return Err(ConversionError::DecodeError(format!(
                "{}x{} image carries {} bytes, expected {}",
                width,
                height,
                image.data.len(),
                expected
            )));
        }

        if !self.config.validate_dimensions {
            return Ok(());
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Decodes `input_data`, converts it to luma and encodes the result as
    /// `format` into `output`. Returns the grayscale image.
    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(
        &self,
        input_data: &[u8],
        format: ImageFormat,
        output: &mut dyn Write,
    ) -> Result<GrayImageData> {
        info!("Starting grayscale conversion");

        let rgb_image = {
            let _span = tracing::info_span!("decode").entered();
            self.reader.read_rgb(input_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = rgb_image.width,
                height = rgb_image.height
            ).entered();
            self.validate_dimensions(&rgb_image)?;
        }

        let gray_image = {
            let _span = tracing::info_span!("to_luma").entered();
            to_luma(&rgb_image)
        };

        {
            let _span = tracing::info_span!("encode").entered();
            self.writer.write_gray(&gray_image, format, output, &self.config)?;
        }

        info!(
            width = gray_image.width,
            height = gray_image.height,
            "Conversion complete"
        );
        Ok(gray_image)
    }

    /// Converts the image at `input_path` and writes it to `output_path`.
    ///
    /// The output is fully encoded before anything touches the destination and
    /// is then moved into place, so a failed conversion never leaves a partial
    /// file behind.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<GrayImageData> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    ConversionError::FileNotFound(input_path.to_path_buf())
                }
                _ => ConversionError::InputReadError(format!("{}: {}", input_path.display(), e)),
            })?
        };

        let format = output_format(output_path)?;

        let mut encoded = Vec::new();
        let gray_image = self.convert(&input_data, format, &mut encoded)?;

        {
            let _span = tracing::info_span!("write_output_file", bytes = encoded.len()).entered();
            write_atomically(output_path, &encoded)?;
        }

        Ok(gray_image)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}

/// Converts `input_path` to grayscale at `output_path` with the default
/// configuration.
pub fn convert_to_grayscale<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
) -> Result<()> {
    GrayscalePipeline::new(ConversionConfig::default()).convert_file(input_path, output_path)?;
    Ok(())
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err =
        |e: std::io::Error| ConversionError::OutputWriteError(format!("{}: {}", path.display(), e));

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;

    // Temporary files are created owner-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
