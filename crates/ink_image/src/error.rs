//! Image error types

use thiserror::Error;

/// Errors raised while loading a reveal image
#[derive(Error, Debug)]
pub enum ImageError {
    /// Failed to read the file
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Zero-sized image or pixel buffer that does not match its dimensions
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The source kind cannot be loaded in-process
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
}

/// Result type for image operations
pub type Result<T> = std::result::Result<T, ImageError>;
