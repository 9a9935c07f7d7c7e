//! Axis aligned rectangle in local 2D space.
//!
//! The y axis grows downward for rectangles: `top <= bottom` for any
//! non-degenerate rectangle.

use std::fmt;

use super::math::Vec3;

/// Rectangle described by its edges and dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
    /// Whether the position given to [`Rectangle::set`] was the center
    pub centered: bool,
}

impl Rectangle {
    /// Zero sized, uncentered rectangle at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangle whose top-left corner is at `x, y`.
    pub fn uncentered(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut r = Self::new();
        r.set(x, y, width, height, false);
        r
    }

    /// Rectangle centered on `x, y`.
    pub fn centered(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut r = Self::new();
        r.set(x, y, width, height, true);
        r
    }

    /// Rectangle from its edges.
    pub fn from_corners(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        let mut r = Self::new();
        r.set_by_corners(left, top, right, bottom);
        r
    }

    /// Set position and dimensions.
    pub fn set(&mut self, x: f32, y: f32, width: f32, height: f32, centered: bool) {
        if centered {
            let hw = width / 2.0;
            let hh = height / 2.0;
            self.left = x - hw;
            self.top = y - hh;
            self.right = x + hw;
            self.bottom = y + hh;
        } else {
            self.left = x;
            self.top = y;
            self.right = x + width;
            self.bottom = y + height;
        }

        self.width = width;
        self.height = height;
        self.centered = centered;
    }

    /// Set the edges directly; the result is uncentered.
    pub fn set_by_corners(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        self.left = left;
        self.top = top;
        self.right = right;
        self.bottom = bottom;
        self.width = right - left;
        self.height = bottom - top;
        self.centered = false;
    }

    /// Copy `src`, keeping its centering.
    pub fn set_with_rectangle(&mut self, src: &Self) {
        if src.centered {
            let (cx, cy) = (src.left + src.width / 2.0, src.top + src.height / 2.0);
            self.set(cx, cy, src.width, src.height, true);
        } else {
            self.set(src.left, src.top, src.width, src.height, false);
        }
    }

    /// Resize. A centered rectangle is re-centered on the origin, an
    /// uncentered one keeps its top-left corner.
    pub fn set_size(&mut self, width: f32, height: f32) {
        if self.centered {
            self.set(0.0, 0.0, width, height, true);
        } else {
            self.set(self.left, self.top, width, height, false);
        }
    }

    /// Resize to a square, keeping the current center (centered) or the
    /// top-left corner (uncentered).
    pub fn set_uniform_size(&mut self, length: f32) {
        if self.centered {
            let c = self.center();
            self.set(c.x, c.y, length, length, true);
        } else {
            self.set(self.left, self.top, length, length, false);
        }
    }

    /// Center point with z = 0.
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.left + self.width / 2.0, self.top + self.height / 2.0, 0.0)
    }

    /// Inclusive point test.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Inclusive point test using the x/y of `v`.
    pub fn contains_vector(&self, v: &Vec3) -> bool {
        self.contains_point(v.x, v.y)
    }

    /// Whether `other` lies entirely inside, edges inclusive.
    pub fn contains_rectangle(&self, other: &Self) -> bool {
        self.contains_point(other.left, other.top) && self.contains_point(other.right, other.bottom)
    }

    /// Exclusive point test.
    pub fn contains_point_exclusive(&self, x: f32, y: f32) -> bool {
        x > self.left && x < self.right && y > self.top && y < self.bottom
    }

    /// Whether the rectangles share any point. Symmetric.
    pub fn overlaps(&self, other: &Self) -> bool {
        if other.left > self.right || self.left > other.right {
            return false;
        }

        if other.top > self.bottom || self.top > other.bottom {
            return false;
        }

        true
    }

    /// Smallest rectangle enclosing both.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_corners(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}, {}>:<{}, {}> {} x {} : Centered ({})",
            self.left, self.top, self.right, self.bottom, self.width, self.height, self.centered
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncentered_construction() {
        let r = Rectangle::uncentered(0.0, 0.0, 5.0, 10.0);
        assert_eq!(r.left, 0.0);
        assert_eq!(r.top, 0.0);
        assert_eq!(r.right, 5.0);
        assert_eq!(r.bottom, 10.0);
    }

    #[test]
    fn test_centered_construction() {
        let r = Rectangle::centered(0.0, 0.0, 5.0, 10.0);
        assert_eq!(r.left, -2.5);
        assert_eq!(r.top, -5.0);
        assert_eq!(r.right, 2.5);
        assert_eq!(r.bottom, 5.0);
    }

    #[test]
    fn test_set_size_recenters() {
        let mut r = Rectangle::centered(0.0, 0.0, 5.0, 10.0);
        r.set_size(10.0, 10.0);
        assert_eq!(r.left, -5.0);
        assert_eq!(r.top, -5.0);
        assert_eq!(r.right, 5.0);
        assert_eq!(r.bottom, 5.0);
    }

    #[test]
    fn test_set_uniform_size_keeps_center() {
        let mut r = Rectangle::centered(4.0, 2.0, 2.0, 6.0);
        r.set_uniform_size(4.0);
        assert_eq!(r.center(), Vec3::new(4.0, 2.0, 0.0));
        assert_eq!(r.width, 4.0);
        assert_eq!(r.height, 4.0);
    }

    #[test]
    fn test_contains_point() {
        let r = Rectangle::centered(0.0, 0.0, 5.0, 10.0);
        assert!(r.contains_point(2.0, 2.0));
        assert!(r.contains_point(0.0, 2.0));
        assert!(r.contains_point(-2.5, 2.0));
        assert!(!r.contains_point(-2.6, 2.0));
        assert!(!r.contains_point(-2.0, 9.0));
        assert!(!r.contains_point_exclusive(-2.5, 2.0));
    }

    #[test]
    fn test_contains_rectangle() {
        let r1 = Rectangle::centered(0.0, 0.0, 10.0, 10.0);
        let r2 = Rectangle::centered(5.0, 5.0, 10.0, 10.0);
        assert!(!r1.contains_rectangle(&r2));

        let r3 = Rectangle::uncentered(0.0, 0.0, 10.0, 10.0);
        let mut r4 = Rectangle::uncentered(5.0, 5.0, 4.0, 4.0);
        assert!(r3.contains_rectangle(&r4));

        r4.set(5.0, 5.0, 12.0, 12.0, false);
        assert!(!r3.contains_rectangle(&r4));
    }

    #[test]
    fn test_overlaps_is_symmetric() {
        let r3 = Rectangle::uncentered(0.0, 0.0, 10.0, 10.0);
        let cases = [
            Rectangle::uncentered(5.0, 5.0, 9.0, 9.0),
            Rectangle::uncentered(5.0, 5.0, 12.0, 12.0),
            Rectangle::uncentered(11.0, 11.0, 15.0, 15.0),
            Rectangle::centered(0.0, 0.0, 1.0, 1.0),
            Rectangle::from_corners(-4.0, -4.0, -1.0, -1.0),
        ];
        let expected = [true, true, false, true, false];

        for (other, want) in cases.iter().zip(expected) {
            assert_eq!(r3.overlaps(other), want, "{other}");
            assert_eq!(r3.overlaps(other), other.overlaps(&r3), "{other}");
        }
    }

    #[test]
    fn test_union() {
        let r3 = Rectangle::from_corners(5.0, 10.0, 20.0, 20.0);
        let r4 = Rectangle::from_corners(15.0, 5.0, 25.0, 15.0);
        let u = r3.union(&r4);
        assert_eq!(u.left, 5.0);
        assert_eq!(u.top, 5.0);
        assert_eq!(u.right, 25.0);
        assert_eq!(u.bottom, 20.0);
        assert_eq!(u.width, 20.0);
        assert_eq!(u.height, 15.0);
    }
}
