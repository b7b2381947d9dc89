//! Image source types

use std::path::PathBuf;

/// Source of a reveal image
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Load from a file path
    File(PathBuf),

    /// A remote URL. Fetching is the host's job; loading this directly fails
    /// with [`ImageError::UnsupportedSource`](crate::ImageError::UnsupportedSource).
    Url(String),

    /// Encoded bytes with an optional format hint
    Bytes {
        data: Vec<u8>,
        format: Option<ImageFormat>,
    },

    /// Pre-decoded straight-alpha RGBA pixels
    Rgba {
        /// RGBA pixel data (4 bytes per pixel)
        data: Vec<u8>,
        width: u32,
        height: u32,
    },
}

impl ImageSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn bytes(data: Vec<u8>) -> Self {
        Self::Bytes { data, format: None }
    }

    pub fn bytes_with_format(data: Vec<u8>, format: ImageFormat) -> Self {
        Self::Bytes {
            data,
            format: Some(format),
        }
    }

    pub fn rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self::Rgba {
            data,
            width,
            height,
        }
    }

    /// Parse a resource URI string into an ImageSource
    ///
    /// - `http://...` or `https://...` - URL
    /// - `file:///path/to/image.png` - File path
    /// - anything else - treated as a file path
    pub fn from_uri(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            Self::Url(uri.to_string())
        } else if let Some(path) = uri.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(uri))
        }
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
            Self::Bytes { data, .. } => format!("<{} bytes>", data.len()),
            Self::Rgba { width, height, .. } => format!("<rgba {width}x{height}>"),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self::from_uri(s)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

/// Image format hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_uri() {
        assert!(matches!(
            ImageSource::from_uri("https://example.com/a.png"),
            ImageSource::Url(_)
        ));
        match ImageSource::from_uri("file:///tmp/a.png") {
            ImageSource::File(path) => assert_eq!(path, PathBuf::from("/tmp/a.png")),
            other => panic!("unexpected source {other:?}"),
        }
        assert!(matches!(
            ImageSource::from_uri("photos/a.jpg"),
            ImageSource::File(_)
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("tiff"), None);
    }
}
