//! Viewport visibility test
//!
//! The host owns the actual observer; this is the ratio check it performs,
//! so headless hosts can gate a reveal on a scrolled layout.

use ink_core::Rect;

/// Fraction of `element` inside `viewport` grown by `root_margin` on every side
pub fn intersection_ratio(element: Rect, viewport: Rect, root_margin: f32) -> f32 {
    let root = viewport.outset(root_margin);

    let area = element.area();
    if area <= 0.0 {
        // A degenerate element counts as fully visible once it sits inside the root
        return if root.contains(element.origin) { 1.0 } else { 0.0 };
    }

    element
        .intersection(&root)
        .map_or(0.0, |overlap| (overlap.area() / area).min(1.0))
}

/// Whether the element crosses the visibility threshold.
///
/// A threshold of 0 means any overlap at all.
pub fn is_visible(element: Rect, viewport: Rect, threshold: f32, root_margin: f32) -> bool {
    let ratio = intersection_ratio(element, viewport, root_margin);
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_fully_inside() {
        let element = Rect::new(100.0, 100.0, 200.0, 100.0);
        assert_eq!(intersection_ratio(element, viewport(), 0.0), 1.0);
        assert!(is_visible(element, viewport(), 1.0, 0.0));
    }

    #[test]
    fn test_partially_below_fold() {
        // 40 of 200 rows visible
        let element = Rect::new(0.0, 560.0, 100.0, 200.0);
        let ratio = intersection_ratio(element, viewport(), 0.0);
        assert!((ratio - 0.2).abs() < 1e-6);
        assert!(is_visible(element, viewport(), 0.1, 0.0));
        assert!(!is_visible(element, viewport(), 0.25, 0.0));
    }

    #[test]
    fn test_root_margin_extends_viewport() {
        let element = Rect::new(0.0, 650.0, 100.0, 100.0);
        assert!(!is_visible(element, viewport(), 0.1, 0.0));
        assert!(is_visible(element, viewport(), 0.1, 100.0));
        // Negative margins shrink the root
        let edge = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert!(!is_visible(edge, viewport(), 0.0, -60.0));
    }

    #[test]
    fn test_zero_threshold_needs_overlap() {
        let outside = Rect::new(900.0, 0.0, 50.0, 50.0);
        assert!(!is_visible(outside, viewport(), 0.0, 0.0));
    }
}
