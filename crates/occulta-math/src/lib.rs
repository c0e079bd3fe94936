#![warn(missing_docs)]

//! Math types for the occulta visibility engine.
//!
//! Thin wrappers around nalgebra providing the handful of types the
//! eclipse detectors share: 3D points and vectors in the observer's frame,
//! 2D points on the sky plane, a tolerance value, and the 2D predicates
//! used by the convex-hull tests.
//!
//! The line of sight is the Z axis. The observer sits at `Z = -inf`, so a
//! smaller Z is closer to the observer, and projecting onto the sky plane
//! keeps the `(x, y)` components.

use nalgebra::{Vector2, Vector3};

mod bbox;
pub mod predicates;

pub use bbox::{Aabb2, Aabb3};
pub use predicates::{point_segment_distance, turn, Turn};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point on the sky plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector on the sky plane.
pub type Vec2 = Vector2<f64>;

/// Unit vector pointing from the scene towards the observer.
#[inline]
pub fn toward_observer() -> Vec3 {
    Vec3::new(0.0, 0.0, -1.0)
}

/// Project a point onto the sky plane (orthogonal to the line of sight).
#[inline]
pub fn project(p: &Point3) -> Point2 {
    Point2::new(p.x, p.y)
}

/// Depth of a point along the line of sight. Smaller is closer.
#[inline]
pub fn depth(p: &Point3) -> f64 {
    p.z
}

/// Absolute tolerance for near-degenerate comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Absolute threshold below which a scalar counts as zero.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-6), the value the ray tests were tuned with.
    pub const DEFAULT: Self = Self { linear: 1e-6 };

    /// Create a tolerance with the given absolute threshold.
    pub const fn new(linear: f64) -> Self {
        Self { linear }
    }

    /// Check if a scalar is effectively zero.
    #[inline]
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
