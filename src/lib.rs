//! Single-image grayscale conversion.
//!
//! Decodes a color image, maps every pixel to `0.299 R + 0.587 G + 0.114 B`
//! and writes the single-channel result in the format named by the output
//! path.

pub mod image_pipeline;
pub mod logger;
pub mod preview;

pub use image_pipeline::{convert_to_grayscale, ConversionError, ErrorKind, GrayscalePipeline};
