//! Core geometry types
//!
//! All reveal geometry is expressed in logical units. The compositor is the
//! only place that multiplies by a device pixel ratio.

use serde::{Deserialize, Serialize};

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The larger of width and height
    pub fn max_dimension(&self) -> f32 {
        self.width.max(self.height)
    }

    /// True when either dimension is zero, negative or not finite
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Convert to a Rect at the origin (0, 0)
    pub const fn to_rect(self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self,
        }
    }
}

impl From<Size> for Rect {
    fn from(size: Size) -> Self {
        size.to_rect()
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn area(&self) -> f32 {
        self.size.width.max(0.0) * self.size.height.max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.right()
            && point.y >= self.origin.y
            && point.y <= self.bottom()
    }

    /// Grow the rect by `amount` on every side (negative shrinks)
    pub fn outset(&self, amount: f32) -> Self {
        Rect::new(
            self.origin.x - amount,
            self.origin.y - amount,
            (self.size.width + 2.0 * amount).max(0.0),
            (self.size.height + 2.0 * amount).max(0.0),
        )
    }

    /// Overlapping region of two rects, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x().max(other.x());
        let top = self.y().max(other.y());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_empty() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(10.0, 0.0).is_empty());
        assert!(Size::new(f32::NAN, 10.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);

        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 80.0, 50.0, 20.0)));
        assert_eq!(a.intersection(&Rect::new(200.0, 0.0, 10.0, 10.0)), None);
    }

    #[test]
    fn test_rect_outset() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0).outset(5.0);
        assert_eq!(r, Rect::new(5.0, 5.0, 30.0, 30.0));

        let collapsed = Rect::new(0.0, 0.0, 4.0, 4.0).outset(-10.0);
        assert_eq!(collapsed.size, Size::ZERO);
    }
}
