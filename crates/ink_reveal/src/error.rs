//! Reveal error types

use thiserror::Error;

/// Reveal engine errors
#[derive(Error, Debug)]
pub enum RevealError {
    /// The source image could not be fetched or decoded
    #[error("Image load failed: {0}")]
    ImageLoad(#[from] ink_image::ImageError),

    /// The drawing target is not mounted or has no size yet.
    /// Recovered by skipping the frame; never surfaced to the host.
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(&'static str),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for this schema
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be written out
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// Result type for reveal operations
pub type Result<T> = std::result::Result<T, RevealError>;
