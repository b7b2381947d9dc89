//! Blob descriptors

use ink_animation::Easing;
use ink_core::{Point, Size};
use serde::{Deserialize, Serialize};

/// One ink-blob anchor and its growth parameters.
///
/// Positions and sizes are normalized to the reveal frame, so the same set
/// is reused unchanged on every frame regardless of surface size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobDescriptor {
    /// Horizontal anchor in `[0, 1]`, left to right
    pub x: f32,
    /// Vertical anchor in `[0, 1]`, top to bottom
    pub y: f32,
    /// Maximum radius as a fraction of the larger frame dimension
    pub base_size: f32,
    /// Phase offset for the edge noise
    pub seed: f32,
    /// Fraction of the timeline this blob waits before growing
    pub delay: f32,
}

impl BlobDescriptor {
    /// Anchor position in frame coordinates
    pub fn center_in(&self, frame: Size) -> Point {
        Point::new(self.x * frame.width, self.y * frame.height)
    }

    /// Local progress after the blob's delay, unclamped above.
    ///
    /// Zero while the global timeline is still inside the delay window.
    /// Blobs with `delay >= 1` never start.
    pub fn delayed_progress(&self, global_progress: f32) -> f32 {
        if self.delay >= 1.0 {
            return 0.0;
        }
        ((global_progress - self.delay) / (1.0 - self.delay)).max(0.0)
    }

    /// Eased growth of this blob at a point on the global timeline
    pub fn progress_at(&self, global_progress: f32, easing: Easing) -> f32 {
        easing.apply(self.delayed_progress(global_progress))
    }
}

/// A caller-supplied blob position.
///
/// Missing `size` is sampled from the configured range; missing `delay` is
/// spread evenly across the stagger window by list position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomBlob {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f32>,
}

impl CustomBlob {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            size: None,
            delay: None,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(delay: f32) -> BlobDescriptor {
        BlobDescriptor {
            x: 0.5,
            y: 0.25,
            base_size: 0.2,
            seed: 1.0,
            delay,
        }
    }

    #[test]
    fn test_center_in_frame() {
        assert_eq!(
            blob(0.0).center_in(Size::new(200.0, 100.0)),
            Point::new(100.0, 25.0)
        );
    }

    #[test]
    fn test_delay_window_clamps_to_zero() {
        let b = blob(0.5);
        assert_eq!(b.delayed_progress(0.4), 0.0);
        assert_eq!(b.progress_at(0.4, Easing::EaseOut), 0.0);
        assert!((b.delayed_progress(0.75) - 0.5).abs() < 1e-6);
        assert_eq!(b.delayed_progress(1.0), 1.0);
    }

    #[test]
    fn test_delay_at_or_past_end_never_grows() {
        assert_eq!(blob(1.0).delayed_progress(1.0), 0.0);
        assert_eq!(blob(1.5).delayed_progress(1.0), 0.0);
    }
}
