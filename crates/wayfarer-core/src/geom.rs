//! World-space geometry: [`Point`] and [`Rect`].
//!
//! Positions are integer world units. A graph usually spans many units per
//! node (see [`GridGraph::node_size`](crate::GridGraph::node_size)), so an
//! agent standing off a node's centre is still exact.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A position or offset in world units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Squared length, widened so that world-sized offsets cannot overflow.
    #[inline]
    pub fn sq_magnitude(self) -> i64 {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        x * x + y * y
    }

    #[inline]
    pub fn magnitude(self) -> f64 {
        (self.sq_magnitude() as f64).sqrt()
    }

    /// Length as a path cost: rounded to the nearest unit.
    #[inline]
    pub fn cost_magnitude(self) -> u32 {
        self.magnitude().round() as u32
    }

    /// Per-axis minimum.
    #[inline]
    pub fn min(self, other: Point) -> Point {
        Point::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Per-axis maximum.
    #[inline]
    pub fn max(self, other: Point) -> Point {
        Point::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Orthogonal neighbours, clockwise from up.
    #[inline]
    pub fn neighbors_4(self) -> [Point; 4] {
        [self.shift(0, -1), self.shift(1, 0), self.shift(0, 1), self.shift(-1, 0)]
    }

    /// Orthogonal and diagonal neighbours, clockwise from up.
    #[inline]
    pub fn neighbors_8(self) -> [Point; 8] {
        [
            self.shift(0, -1),
            self.shift(1, -1),
            self.shift(1, 0),
            self.shift(1, 1),
            self.shift(0, 1),
            self.shift(-1, 1),
            self.shift(-1, 0),
            self.shift(-1, -1),
        ]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.shift(rhs.x, rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.shift(-rhs.x, -rhs.y)
    }
}

impl Mul<i32> for Point {
    type Output = Self;
    #[inline]
    fn mul(self, k: i32) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle covering `min` up to but excluding `max`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// The rectangle at `min` spanning `width` by `height`.
    #[inline]
    pub fn sized(min: Point, width: i32, height: i32) -> Self {
        Self {
            min,
            max: min.shift(width.max(0), height.max(0)),
        }
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Closest point to `p` inside the rectangle. An empty rectangle leaves
    /// `p` as is.
    #[inline]
    pub fn clamp(self, p: Point) -> Point {
        if self.is_empty() {
            return p;
        }
        Point::new(
            p.x.clamp(self.min.x, self.max.x - 1),
            p.y.clamp(self.min.y, self.max.y - 1),
        )
    }

    /// Every point inside, row by row.
    pub fn points(self) -> impl Iterator<Item = Point> {
        let (x0, x1) = (self.min.x, self.max.x);
        (self.min.y..self.max.y).flat_map(move |y| (x0..x1).map(move |x| Point::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Point::new(1, 2);
        let b = Point::new(3, -4);
        assert_eq!(a + b, Point::new(4, -2));
        assert_eq!(b - a, Point::new(2, -6));
        assert_eq!(a * 10, Point::new(10, 20));
        assert_eq!(a.min(b), Point::new(1, -4));
        assert_eq!(a.max(b), Point::new(3, 2));
    }

    #[test]
    fn magnitudes() {
        let p = Point::new(3, 4);
        assert_eq!(p.sq_magnitude(), 25);
        assert_eq!(p.magnitude(), 5.0);
        assert_eq!(Point::new(1000, 1000).cost_magnitude(), 1414);
        assert_eq!(Point::new(i32::MAX, 0).sq_magnitude(), i64::from(i32::MAX).pow(2));
    }

    #[test]
    fn rect_contains_and_clamps() {
        let r = Rect::sized(Point::new(10, 20), 10, 5);
        assert!(r.contains(Point::new(10, 20)));
        assert!(r.contains(Point::new(19, 24)));
        assert!(!r.contains(Point::new(20, 20)));
        assert_eq!(r.clamp(Point::new(-3, 22)), Point::new(10, 22));
        assert_eq!(r.clamp(Point::new(50, 50)), Point::new(19, 24));
    }

    #[test]
    fn rect_points_row_major() {
        let pts: Vec<_> = Rect::sized(Point::ZERO, 3, 2).points().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[1], Point::new(1, 0));
        assert_eq!(pts[5], Point::new(2, 1));
        assert_eq!(Rect::sized(Point::ZERO, 0, 4).points().count(), 0);
        assert!(Rect::default().is_empty());
    }
}
