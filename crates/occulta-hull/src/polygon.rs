//! Convex polygons on the sky plane, built with quickhull.
//!
//! A point set is reduced to its convex hull once; containment queries are
//! then a bounding-box check followed by one orientation test per edge.

use occulta_math::predicates::cross;
use occulta_math::{Aabb2, Point2};

/// Convex hull of a 2D point set, counter-clockwise, without collinear
/// vertices.
///
/// Fewer than three distinct points (or collinear input) give a degenerate
/// hull of one or two vertices; containment then means lying on the point
/// or segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Point2>,
    bounds: Aabb2,
}

impl ConvexPolygon {
    /// Convex hull of `points`. Non-finite points are ignored.
    pub fn from_points(points: &[Point2]) -> Self {
        let finite: Vec<Point2> = points
            .iter()
            .copied()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        let vertices = quickhull(&finite);
        let bounds = Aabb2::from_points(&vertices);
        Self { vertices, bounds }
    }

    /// Hull vertices, counter-clockwise.
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// Number of hull vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if built from no points.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Bounding box of the hull.
    pub fn bounds(&self) -> &Aabb2 {
        &self.bounds
    }

    /// Enclosed area (zero for degenerate hulls).
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let origin = self.vertices[0];
        (1..n - 1)
            .map(|i| cross(&origin, &self.vertices[i], &self.vertices[i + 1]))
            .sum::<f64>()
            * 0.5
    }

    /// True if `p` lies inside the hull or on its boundary.
    pub fn contains(&self, p: &Point2) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        match self.vertices.len() {
            0 => false,
            // Inside the bounding box of a point or a segment is on it, up
            // to the collinearity check
            1 => true,
            2 => cross(&self.vertices[0], &self.vertices[1], p) == 0.0,
            n => (0..n).all(|i| cross(&self.vertices[i], &self.vertices[(i + 1) % n], p) >= 0.0),
        }
    }
}

fn quickhull(points: &[Point2]) -> Vec<Point2> {
    let lexicographic = |a: &&Point2, b: &&Point2| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y));
    let (Some(&a), Some(&b)) = (
        points.iter().min_by(lexicographic),
        points.iter().max_by(lexicographic),
    ) else {
        return Vec::new();
    };
    if a == b {
        return vec![a];
    }

    let (below, above): (Vec<Point2>, Vec<Point2>) = points
        .iter()
        .filter(|p| cross(&a, &b, p) != 0.0)
        .partition(|p| cross(&a, &b, p) < 0.0);

    let mut hull = vec![a];
    expand(&below, a, b, &mut hull);
    hull.push(b);
    expand(&above, b, a, &mut hull);
    hull
}

/// Push the hull vertices strictly right of `p -> q`, in order from `p` to `q`.
fn expand(candidates: &[Point2], p: Point2, q: Point2, hull: &mut Vec<Point2>) {
    let Some(&far) = candidates
        .iter()
        .min_by(|u, v| cross(&p, &q, u).total_cmp(&cross(&p, &q, v)))
    else {
        return;
    };

    let right_of = |s: Point2, e: Point2| -> Vec<Point2> {
        candidates
            .iter()
            .copied()
            .filter(|c| cross(&s, &e, c) < 0.0)
            .collect()
    };
    let first = right_of(p, far);
    let second = right_of(far, q);

    expand(&first, p, far, hull);
    hull.push(far);
    expand(&second, far, q, hull);
}
