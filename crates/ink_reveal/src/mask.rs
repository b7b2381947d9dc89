//! Blob mask geometry
//!
//! Pure coordinate math: tracing one noisy-edge blob outline and assembling
//! the per-frame set of outlines whose union is the visible region. Nothing
//! here touches a drawing surface; see [`crate::compositor`] for that.

use crate::blob::BlobDescriptor;
use ink_animation::Easing;
use ink_core::{Point, Rect, Size};
use smallvec::SmallVec;
use std::f32::consts::TAU;

/// Edge noise harmonics as `(frequency, seed multiplier, amplitude)`
const HARMONICS: [(f32, f32, f32); 3] = [(3.0, 1.0, 0.18), (7.0, 2.1, 0.09), (13.0, 3.7, 0.04)];

/// Target radius multiplier applied to `base_size`
pub const GROWTH_FACTOR: f32 = 1.2;

/// No blob may exceed this fraction of the larger frame dimension
pub const MAX_RADIUS_FRACTION: f32 = 0.5;

/// How much of the edge noise fades out as a blob matures
pub const NOISE_SETTLE: f32 = 0.6;

/// Blobs at or below this radius are not rasterized
pub const MIN_RADIUS: f32 = 1.0;

/// Fewest edge points that still make a closed area
pub const MIN_EDGE_POINTS: usize = 3;

/// Edge noise settings shared by every blob in a reveal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    /// Noise amount in `[0, 1]`; 0 traces a regular polygon
    pub roughness: f32,
    /// Number of edge segments per blob
    pub points: usize,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            roughness: 0.3,
            points: 60,
        }
    }
}

/// A closed blob outline in frame coordinates.
///
/// The last point repeats the first.
#[derive(Clone, Debug, PartialEq)]
pub struct BlobPath {
    points: SmallVec<[Point; 64]>,
}

impl BlobPath {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounds of the outline
    pub fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        let (mut min, mut max) = (*first, *first);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Point-in-outline test using the nonzero winding rule
    pub fn contains(&self, point: Point) -> bool {
        winding_number(&self.points, point) != 0
    }
}

/// Trace the outline of one blob.
///
/// Produces `point_count + 1` points at equally spaced angles around the
/// full circle. The radius at each angle is perturbed by three summed sine
/// harmonics scaled by `roughness`, and the perturbation shrinks as
/// `blob_progress` approaches 1 so edges smooth out when the blob matures.
pub fn trace_blob_path(
    center: Point,
    radius: f32,
    seed: f32,
    blob_progress: f32,
    roughness: f32,
    point_count: usize,
) -> BlobPath {
    let point_count = point_count.max(MIN_EDGE_POINTS);
    let settle = 1.0 - blob_progress * NOISE_SETTLE;

    let points = (0..=point_count)
        .map(|i| {
            let angle = (i as f32 / point_count as f32) * TAU;
            let noise: f32 = HARMONICS
                .iter()
                .map(|&(freq, phase, amp)| (angle * freq + seed * phase).sin() * amp * roughness)
                .sum();
            let r = radius * (1.0 + noise * settle);
            Point::new(center.x + angle.cos() * r, center.y + angle.sin() * r)
        })
        .collect();

    BlobPath { points }
}

/// Radius a blob reaches at `blob_progress` inside a frame, after the cap
pub fn blob_radius(base_size: f32, blob_progress: f32, frame: Size) -> f32 {
    let max_dim = frame.max_dimension();
    let target = blob_progress * max_dim * base_size * GROWTH_FACTOR;
    target.min(max_dim * MAX_RADIUS_FRACTION)
}

/// One rasterizable blob in a frame's mask
#[derive(Clone, Debug, PartialEq)]
pub struct BlobShape {
    /// Index into the blob set this shape came from
    pub index: usize,
    pub center: Point,
    pub radius: f32,
    /// Eased progress used for the edge noise
    pub progress: f32,
    pub path: BlobPath,
}

/// The visible region for one frame: the union of its blob outlines
#[derive(Clone, Debug, PartialEq)]
pub struct MaskFrame {
    pub frame: Size,
    pub shapes: Vec<BlobShape>,
}

impl MaskFrame {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Whether a frame point is inside the union of all outlines
    pub fn contains(&self, point: Point) -> bool {
        self.shapes.iter().any(|shape| shape.path.contains(point))
    }

    /// Radius of the shape generated from blob `index`, if it was drawn
    pub fn radius_of(&self, index: usize) -> Option<f32> {
        self.shapes
            .iter()
            .find(|shape| shape.index == index)
            .map(|shape| shape.radius)
    }
}

/// Build the mask for one frame.
///
/// Blobs whose eased progress is not positive, or whose radius would be at
/// most [`MIN_RADIUS`], are left out.
pub fn assemble_mask(
    blobs: &[BlobDescriptor],
    global_progress: f32,
    easing: Easing,
    frame: Size,
    style: EdgeStyle,
) -> MaskFrame {
    let mut shapes = Vec::with_capacity(blobs.len());

    for (index, blob) in blobs.iter().enumerate() {
        let progress = blob.progress_at(global_progress, easing);
        if progress <= 0.0 {
            continue;
        }

        let radius = blob_radius(blob.base_size, progress, frame);
        if radius <= MIN_RADIUS {
            continue;
        }

        let center = blob.center_in(frame);
        let path = trace_blob_path(
            center,
            radius,
            blob.seed,
            progress,
            style.roughness,
            style.points,
        );
        shapes.push(BlobShape {
            index,
            center,
            radius,
            progress,
            path,
        });
    }

    tracing::trace!(
        progress = global_progress,
        drawn = shapes.len(),
        total = blobs.len(),
        "assembled blob mask"
    );

    MaskFrame { frame, shapes }
}

fn winding_number(polygon: &[Point], p: Point) -> i32 {
    let mut winding = 0;
    for edge in polygon.windows(2) {
        let (a, b) = (edge[0], edge[1]);
        let side = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{BlobGenerator, LayoutParams, Pattern};

    const FRAME: Size = Size::new(400.0, 300.0);

    fn blob(x: f32, y: f32, base_size: f32, delay: f32) -> BlobDescriptor {
        BlobDescriptor {
            x,
            y,
            base_size,
            seed: 17.0,
            delay,
        }
    }

    #[test]
    fn test_path_closes_on_itself() {
        let path = trace_blob_path(Point::new(10.0, 20.0), 5.0, 3.3, 0.2, 0.3, 24);
        assert_eq!(path.len(), 25);
        let (first, last) = (path.points()[0], path.points()[24]);
        assert!(first.distance(last) < 1e-4);
    }

    #[test]
    fn test_point_count_floor() {
        let path = trace_blob_path(Point::ZERO, 5.0, 0.0, 0.0, 0.3, 1);
        assert_eq!(path.len(), MIN_EDGE_POINTS + 1);
    }

    #[test]
    fn test_zero_roughness_is_circle() {
        let center = Point::new(50.0, 50.0);
        let path = trace_blob_path(center, 20.0, 123.0, 0.1, 0.0, 40);
        for p in path.points() {
            assert!((p.distance(center) - 20.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_noise_settles_with_progress() {
        let center = Point::ZERO;
        let spread = |progress: f32| {
            let path = trace_blob_path(center, 100.0, 4.0, progress, 1.0, 60);
            path.points()
                .iter()
                .map(|p| (p.distance(center) - 100.0).abs())
                .fold(0.0f32, f32::max)
        };
        assert!(spread(1.0) < spread(0.0));
        // Full roughness never exceeds the summed amplitudes
        assert!(spread(0.0) <= 100.0 * (0.18 + 0.09 + 0.04) + 1e-3);
    }

    #[test]
    fn test_contains_center() {
        let path = trace_blob_path(Point::new(30.0, 30.0), 10.0, 0.5, 0.5, 0.3, 30);
        assert!(path.contains(Point::new(30.0, 30.0)));
        assert!(!path.contains(Point::new(60.0, 30.0)));
        assert!(path.bounds().contains(Point::new(30.0, 30.0)));
    }

    #[test]
    fn test_delayed_blob_skipped() {
        let blobs = [blob(0.5, 0.5, 0.2, 0.5)];
        let mask = assemble_mask(&blobs, 0.4, Easing::EaseOut, FRAME, EdgeStyle::default());
        assert!(mask.is_empty());
        assert!(!mask.contains(Point::new(200.0, 150.0)));
    }

    #[test]
    fn test_tiny_radius_skipped() {
        // 0.001 * 400 * 0.2 * 1.2 ≈ 0.1 px
        let blobs = [blob(0.5, 0.5, 0.2, 0.0)];
        let mask = assemble_mask(&blobs, 0.001, Easing::Linear, FRAME, EdgeStyle::default());
        assert!(mask.is_empty());
    }

    #[test]
    fn test_radius_capped_at_half_frame() {
        let blobs = [blob(0.5, 0.5, 5.0, 0.0)];
        let mask = assemble_mask(&blobs, 1.0, Easing::EaseOut, FRAME, EdgeStyle::default());
        assert_eq!(mask.radius_of(0), Some(200.0));
        assert_eq!(blob_radius(0.1, 1.0, FRAME), 400.0 * 0.1 * 1.2);
    }

    #[test]
    fn test_coverage_monotonic() {
        let mut gen = BlobGenerator::seeded(21);
        let blobs = gen.generate(&LayoutParams {
            pattern: Pattern::Random,
            ..LayoutParams::default()
        });

        let style = EdgeStyle::default();
        let mut previous = vec![0.0f32; blobs.len()];
        for step in 0..=50 {
            let progress = step as f32 / 50.0;
            let mask = assemble_mask(&blobs, progress, Easing::EaseOut, FRAME, style);
            for (i, prev) in previous.iter_mut().enumerate() {
                let radius = mask.radius_of(i).unwrap_or(0.0);
                assert!(radius + 1e-4 >= *prev, "blob {i} shrank at {progress}");
                *prev = radius;
            }
        }

        // Every blob reaches its full capped radius at the end
        let done = assemble_mask(&blobs, 1.0, Easing::EaseOut, FRAME, style);
        for (i, b) in blobs.iter().enumerate() {
            assert_eq!(done.radius_of(i), Some(blob_radius(b.base_size, 1.0, FRAME)));
        }
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let blobs = [blob(0.2, 0.3, 0.25, 0.1), blob(0.8, 0.6, 0.15, 0.0)];
        let a = assemble_mask(&blobs, 0.55, Easing::EaseInOut, FRAME, EdgeStyle::default());
        let b = assemble_mask(&blobs, 0.55, Easing::EaseInOut, FRAME, EdgeStyle::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_union_covers_each_blob() {
        let blobs = [blob(0.25, 0.5, 0.1, 0.0), blob(0.75, 0.5, 0.1, 0.0)];
        let mask = assemble_mask(&blobs, 1.0, Easing::Linear, FRAME, EdgeStyle::default());
        assert!(mask.contains(Point::new(100.0, 150.0)));
        assert!(mask.contains(Point::new(300.0, 150.0)));
        assert!(!mask.contains(Point::new(200.0, 10.0)));
    }
}
