//! 2D orientation predicates on the sky plane.

use crate::Point2;

/// Orientation of an ordered point triple `(p, q, r)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Clockwise: `r` lies to the right of the directed line `p -> q`.
    Right,
    /// The three points are collinear.
    Straight,
    /// Counter-clockwise: `r` lies to the left of `p -> q`.
    Left,
}

/// Twice the signed area of the triangle `(p, q, r)`.
#[inline]
pub fn cross(p: &Point2, q: &Point2, r: &Point2) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (r.x - p.x) * (q.y - p.y)
}

/// Classify the turn made by walking `p -> q -> r`.
#[inline]
pub fn turn(p: &Point2, q: &Point2, r: &Point2) -> Turn {
    let c = cross(p, q, r);
    if c > 0.0 {
        Turn::Left
    } else if c < 0.0 {
        Turn::Right
    } else {
        Turn::Straight
    }
}

/// Distance from `p` to the closed segment `a-b`.
pub fn point_segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_turn_directions() {
        let p = Point2::new(0.0, 0.0);
        let q = Point2::new(1.0, 0.0);
        assert_eq!(turn(&p, &q, &Point2::new(0.5, 1.0)), Turn::Left);
        assert_eq!(turn(&p, &q, &Point2::new(0.5, -1.0)), Turn::Right);
        assert_eq!(turn(&p, &q, &Point2::new(2.0, 0.0)), Turn::Straight);
    }

    #[test]
    fn test_cross_is_twice_area() {
        let c = cross(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            &Point2::new(0.0, 3.0),
        );
        assert_relative_eq!(c, 6.0);
    }

    #[test]
    fn test_point_segment_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 0.0);
        // Perpendicular foot inside the segment
        assert_relative_eq!(point_segment_distance(&Point2::new(2.0, 3.0), &a, &b), 3.0);
        // Beyond the end: distance to the endpoint
        assert_relative_eq!(point_segment_distance(&Point2::new(7.0, 4.0), &a, &b), 5.0);
        // Degenerate segment
        assert_relative_eq!(point_segment_distance(&Point2::new(3.0, 4.0), &a, &a), 5.0);
    }
}
