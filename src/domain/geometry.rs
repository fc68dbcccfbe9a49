//! Geometric types for scene coordinates
//!
//! World space is a 14.222 x 8 unit frame centred at the origin with y
//! pointing up. Engines map it to their own output space.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::Serialize;

/// Visible frame width in world units
pub const FRAME_WIDTH: f32 = 8.0 * 16.0 / 9.0;
/// Visible frame height in world units
pub const FRAME_HEIGHT: f32 = 8.0;
/// Default gap between an object and a screen edge
pub const EDGE_BUFF: f32 = 0.5;

/// A point or direction in world coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

pub const ORIGIN: Vec2 = Vec2::new(0.0, 0.0);
pub const UP: Vec2 = Vec2::new(0.0, 1.0);
pub const DOWN: Vec2 = Vec2::new(0.0, -1.0);
pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Rotate counter-clockwise by `angle` radians around `about`
    pub fn rotate_about(self, angle: f32, about: Vec2) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        let d = self - about;
        about + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
    }

    /// Scale the offset from `about` by `factor`
    pub fn scale_about(self, factor: f32, about: Vec2) -> Vec2 {
        about + (self - about) * factor
    }

    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        self + (other - self) * t
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Axis-aligned bounding box in world coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Create bounds from arbitrary corner points
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Bounds of a box of the given size centred on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        let half = Vec2::new(width * 0.5, height * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest bounds containing both boxes
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Point on the boundary in direction `dir` from the centre
    ///
    /// `dir` components are expected to be -1, 0 or 1, like the direction
    /// constants.
    pub fn critical_point(&self, dir: Vec2) -> Vec2 {
        let c = self.center();
        Vec2::new(
            c.x + dir.x.signum_or_zero() * self.width() * 0.5,
            c.y + dir.y.signum_or_zero() * self.height() * 0.5,
        )
    }
}

trait SignumOrZero {
    fn signum_or_zero(self) -> f32;
}

impl SignumOrZero for f32 {
    fn signum_or_zero(self) -> f32 {
        if self == 0.0 { 0.0 } else { self.signum() }
    }
}

/// Screen edge for `to_edge` placement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Offset needed to move `bounds` flush against this edge, keeping `buff` clearance
    pub fn offset_for(self, bounds: &Bounds, buff: f32) -> Vec2 {
        let half_w = FRAME_WIDTH * 0.5;
        let half_h = FRAME_HEIGHT * 0.5;
        match self {
            Edge::Top => Vec2::new(0.0, half_h - buff - bounds.max.y),
            Edge::Bottom => Vec2::new(0.0, -half_h + buff - bounds.min.y),
            Edge::Left => Vec2::new(-half_w + buff - bounds.min.x, 0.0),
            Edge::Right => Vec2::new(half_w - buff - bounds.max.x, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_rotate_about_quarter_turn() {
        let p = Vec2::new(2.0, 1.0).rotate_about(PI / 2.0, Vec2::new(1.0, 1.0));
        assert!(close(p, Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_full_rotation_is_identity() {
        let p = Vec2::new(-1.5, 0.0);
        assert!(close(p.rotate_about(2.0 * PI, Vec2::new(-3.0, 0.0)), p));
    }

    #[test]
    fn test_scale_about_center() {
        let p = Vec2::new(1.0, 0.5).scale_about(1.2, Vec2::new(1.0, 0.0));
        assert!(close(p, Vec2::new(1.0, 0.6)));
    }

    #[test]
    fn test_bounds_critical_points() {
        let b = Bounds::from_corners(Vec2::new(2.0, 3.0), Vec2::new(-2.0, -1.0));
        assert_eq!(b.center(), Vec2::new(0.0, 1.0));
        assert_eq!(b.critical_point(DOWN), Vec2::new(0.0, -1.0));
        assert_eq!(b.critical_point(RIGHT), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_edge_offset_moves_flush() {
        let b = Bounds::centered(ORIGIN, 2.0, 1.0);
        let moved = b.center() + Edge::Top.offset_for(&b, EDGE_BUFF);
        assert!((moved.y + 0.5 - (FRAME_HEIGHT / 2.0 - EDGE_BUFF)).abs() < 1e-5);
        let left = Edge::Left.offset_for(&b, EDGE_BUFF);
        assert!((b.min.x + left.x - (-FRAME_WIDTH / 2.0 + EDGE_BUFF)).abs() < 1e-5);
    }
}
