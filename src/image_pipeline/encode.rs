//! Grayscale encoding module
//!
//! Writers serialize single-channel images in the format chosen by the output
//! path, with per-format options carried in `ConversionConfig`.

mod writer;
mod standard_writer;
mod format;
pub mod types;

pub use writer::GrayImageWriter;
pub use standard_writer::StandardGrayWriter;
pub use format::output_format;
pub use types::{ConversionConfig, ConversionConfigBuilder, TiffCompression, DEFAULT_JPEG_QUALITY};
