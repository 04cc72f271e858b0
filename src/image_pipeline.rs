//! Image processing pipeline module
//!
//! This module provides a structured approach to grayscale conversion,
//! with separate modules for decoding, luma conversion, encoding and the
//! orchestration that ties them together.

pub mod decode;
pub mod grayscale;
pub mod encode;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    ErrorKind,
    Result,
};

pub use decode::{
    AutoReader,
    ColorImageReader,
    ImageCrateReader,
    RawLoaderReader,
    RgbImageData,
};

pub use grayscale::{
    GrayImageData,
    luma,
    to_luma,
};

pub use encode::{
    ConversionConfig,
    ConversionConfigBuilder,
    GrayImageWriter,
    StandardGrayWriter,
    TiffCompression,
    output_format,
};

pub use conversions::{
    GrayscalePipeline,
    convert_to_grayscale,
};
