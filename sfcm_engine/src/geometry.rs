// Canvas-space geometry primitives.
//
// `Point` is a pixel-space coordinate (x right, y down, origin at the top-left
// corner). `Canvas` carries the drawing dimensions and owns the clamping rule
// every stage applies at the moment it computes a coordinate: x into
// [0, width], y into [0, height]. Nothing downstream ever re-clamps a point
// produced upstream.
//
// See also: `connection.rs` for the control-point encoding built on these
// types, `branching.rs` for quadratic sampling and segment intersection.

use serde::{Deserialize, Serialize};

/// A point in canvas pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint of the segment `self`–`other`.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Length of the canvas diagonal. Line lengths, dispersion radii and
    /// branch lengths are all fractions of this.
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Clamp a raw coordinate pair into the canvas rectangle.
    pub fn clamp_xy(&self, x: f64, y: f64) -> Point {
        Point::new(x.max(0.0).min(self.width), y.max(0.0).min(self.height))
    }

    pub fn clamp(&self, p: Point) -> Point {
        self.clamp_xy(p.x, p.y)
    }

    /// Whether `p` lies inside the closed canvas rectangle.
    pub fn contains(&self, p: Point) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}

/// Normalize a direction vector. Returns `None` for zero or non-finite input.
pub fn unit_vector(dx: f64, dy: f64) -> Option<(f64, f64)> {
    let len = dx.hypot(dy);
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some((dx / len, dy / len))
}

/// Point on the quadratic Bézier `p0`–`p1`–`p2` at parameter `t`.
pub fn quadratic_point(t: f64, p0: Point, p1: Point, p2: Point) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}
