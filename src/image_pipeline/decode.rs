//! Image decoding module
//!
//! Readers turn encoded input bytes into 8-bit RGB buffers.

mod reader;
mod image_reader;
mod rawloader_reader;
mod auto_reader;
pub mod types;

pub use reader::ColorImageReader;
pub use image_reader::ImageCrateReader;
pub use rawloader_reader::RawLoaderReader;
pub use auto_reader::AutoReader;
pub use types::RgbImageData;
