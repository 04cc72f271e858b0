use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to encode grayscale image: {0}")]
    EncodeError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse failure classes reported to callers of the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input path does not exist.
    FileNotFound,
    /// The input exists but is not a usable image.
    DecodeError,
    /// The output could not be produced at the requested path.
    WriteError,
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::FileNotFound(_) => ErrorKind::FileNotFound,
            ConversionError::InputReadError(_)
            | ConversionError::DecodeError(_)
            | ConversionError::InvalidDimensions(_, _) => ErrorKind::DecodeError,
            ConversionError::UnsupportedFormat(_)
            | ConversionError::EncodeError(_)
            | ConversionError::OutputWriteError(_)
            | ConversionError::IoError(_) => ErrorKind::WriteError,
        }
    }
}

impl ErrorKind {
    /// Process exit status used by the command line tool.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::FileNotFound => 2,
            ErrorKind::DecodeError => 3,
            ErrorKind::WriteError => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
