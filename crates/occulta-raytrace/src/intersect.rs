//! Ray/triangle intersection.
//!
//! The ray is intersected with the triangle's plane first; the plane hit is
//! then expressed in the triangle's edge basis `V0 + s*u + t*v` and accepted
//! when `s >= 0`, `t >= 0` and `s + t <= 1` (up to a tiny slack).

use occulta_math::{Point3, Tolerance};

use crate::ray::Ray;

/// Slack on the edge-basis coordinates. Rays through a shared edge or
/// vertex must not slip between the neighbouring triangles.
const EDGE_EPS: f64 = 1e-9;

/// Outcome of a ray/triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    /// The triangle has zero area; it cannot block anything.
    Degenerate,
    /// No intersection: the ray misses the triangle, runs parallel to its
    /// plane, or meets the plane behind its origin.
    Disjoint,
    /// The ray lies in the triangle's plane.
    Coplanar,
    /// The ray crosses the triangle at parameter `r`.
    Hit {
        /// Ray parameter of the crossing point.
        r: f64,
    },
}

impl Intersection {
    /// Ray parameter of the crossing, if any.
    #[inline]
    pub fn parameter(&self) -> Option<f64> {
        match *self {
            Intersection::Hit { r } => Some(r),
            _ => None,
        }
    }

    /// True if the ray crosses the triangle strictly beyond `r_min` and at
    /// or before `r_max`. Degenerate and coplanar outcomes never block.
    #[inline]
    pub fn blocks_within(&self, r_min: f64, r_max: f64) -> bool {
        matches!(*self, Intersection::Hit { r } if r > r_min && r <= r_max)
    }
}

/// Intersect `ray` with the triangle `tri`.
///
/// Parallelism and coplanarity are decided on the unit normal: the ray is
/// parallel when `|n . d| / |d|` is below `tol`, and coplanar when its origin
/// is also within `tol` of the plane.
pub fn intersect_triangle(ray: &Ray, tri: &[Point3; 3], tol: &Tolerance) -> Intersection {
    let u = tri[1] - tri[0];
    let v = tri[2] - tri[0];
    let n = u.cross(&v);

    let n_len = n.norm();
    let d_len = ray.direction.norm();
    if n_len == 0.0 || !n_len.is_finite() {
        return Intersection::Degenerate;
    }
    if d_len == 0.0 {
        return Intersection::Disjoint;
    }

    let w0 = ray.origin - tri[0];
    let a = -n.dot(&w0);
    let b = n.dot(&ray.direction);

    if tol.is_zero(b / (n_len * d_len)) {
        return if tol.is_zero(a / n_len) {
            Intersection::Coplanar
        } else {
            Intersection::Disjoint
        };
    }

    let r = a / b;
    if r < 0.0 {
        return Intersection::Disjoint;
    }

    let w = ray.at(r) - tri[0];
    let uu = u.dot(&u);
    let uv = u.dot(&v);
    let vv = v.dot(&v);
    let wu = w.dot(&u);
    let wv = w.dot(&v);
    let denom = uv * uv - uu * vv;

    let s = (uv * wv - vv * wu) / denom;
    if !(-EDGE_EPS..=1.0 + EDGE_EPS).contains(&s) {
        return Intersection::Disjoint;
    }
    let t = (uv * wu - uu * wv) / denom;
    if t < -EDGE_EPS || s + t > 1.0 + EDGE_EPS {
        return Intersection::Disjoint;
    }

    Intersection::Hit { r }
}
