//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::vector::Vector2D;

/// An axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at `origin` with the given size.
    pub fn from_origin(origin: Vector2D, width: f64, height: f64) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.center_x(), self.center_y())
    }

    /// `true` if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Interior overlap test.
    ///
    /// Rectangles that merely share an edge do not intersect, and an empty
    /// rectangle intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.max_x() > self.x
            && other.max_y() > self.y
            && other.x < self.max_x()
            && other.y < self.max_y()
    }

    /// `true` if `point` lies inside or on the boundary.
    pub fn contains(&self, point: Vector2D) -> bool {
        point.x >= self.x && point.x <= self.max_x() && point.y >= self.y && point.y <= self.max_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents_and_center() {
        let r = Rect::new(2.0, 4.0, 6.0, 10.0);
        assert_eq!(r.max_x(), 8.0);
        assert_eq!(r.max_y(), 14.0);
        assert_eq!(r.center(), Vector2D::new(5.0, 9.0));
    }

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn empty_rects_never_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(5.0, 5.0, 0.0, 3.0)));
        assert!(!Rect::new(5.0, 5.0, 3.0, -1.0).intersects(&a));
    }

    #[test]
    fn contains_includes_boundary() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(Vector2D::new(10.0, 0.0)));
        assert!(!a.contains(Vector2D::new(10.1, 0.0)));
    }
}
