//! Ink Image
//!
//! Source image handling for ink reveals.
//!
//! # Features
//!
//! - Load images from file paths, in-memory bytes, or raw RGBA
//! - Natural size reporting for the reveal's image-load notification
//! - CSS-style object-fit placement (cover, contain, fill)
//! - Gaussian blur for low-res placeholders
//!
//! # Example
//!
//! ```ignore
//! use ink_image::{ImageData, ImageSource};
//!
//! let data = ImageData::load(ImageSource::file("photo.jpg"))?;
//! println!("{}x{}", data.width(), data.height());
//! ```

mod error;
mod loader;
mod source;

pub use error::{ImageError, Result};
pub use loader::ImageData;
pub use source::ImageSource;

use ink_core::{Rect, Size};
use serde::{Deserialize, Serialize};

// ============================================================================
// CSS-style Object Fit
// ============================================================================

/// How an image is scaled into the reveal frame (CSS object-fit equivalent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectFit {
    /// Fill the frame completely, cropping overflow (maintains aspect ratio)
    #[default]
    Cover,
    /// Fit entirely within the frame (maintains aspect ratio, may letterbox)
    Contain,
    /// Stretch to the exact frame size. CSS modes the canvas cannot express
    /// (`none`, `scale-down`) fall back to this.
    #[serde(alias = "none", alias = "scale-down")]
    Fill,
}

// ============================================================================
// CSS-style Object Position
// ============================================================================

/// Image alignment within its frame (CSS object-position equivalent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectPosition {
    /// Horizontal alignment (0.0 = left, 0.5 = center, 1.0 = right)
    pub x: f32,
    /// Vertical alignment (0.0 = top, 0.5 = center, 1.0 = bottom)
    pub y: f32,
}

impl ObjectPosition {
    pub const TOP_LEFT: Self = Self { x: 0.0, y: 0.0 };
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };
    pub const BOTTOM_RIGHT: Self = Self { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for ObjectPosition {
    fn default() -> Self {
        Self::CENTER
    }
}

// ============================================================================
// Fit Calculation
// ============================================================================

/// Calculate where the whole source image lands inside a frame.
///
/// Coordinates are logical frame units. For `Cover` the rectangle is larger
/// than the frame and the overflow is distributed according to `position`;
/// the caller clips to the frame.
pub fn fit_rect(natural: Size, frame: Size, fit: ObjectFit, position: ObjectPosition) -> Rect {
    if natural.is_empty() || frame.is_empty() {
        return frame.to_rect();
    }

    let scale = match fit {
        ObjectFit::Fill => return frame.to_rect(),
        ObjectFit::Contain => (frame.width / natural.width).min(frame.height / natural.height),
        ObjectFit::Cover => (frame.width / natural.width).max(frame.height / natural.height),
    };

    let draw_w = natural.width * scale;
    let draw_h = natural.height * scale;

    Rect::new(
        (frame.width - draw_w) * position.x,
        (frame.height - draw_h) * position.y,
        draw_w,
        draw_h,
    )
}
