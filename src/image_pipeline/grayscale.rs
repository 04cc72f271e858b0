//! RGB to grayscale conversion

mod luma;
pub mod types;

pub use luma::{luma, to_luma};
pub use types::GrayImageData;
