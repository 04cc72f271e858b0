//! Pipeline conversions module
//!
//! This module contains the orchestration of decode, luma conversion and encode.

mod grayscale_pipeline;


pub use grayscale_pipeline::{convert_to_grayscale, GrayscalePipeline};
