//! Ray representation and the ray/box broadphase test.

use occulta_math::{toward_observer, Aabb3, Point3, Vec3};

/// A ray `origin + r * direction`, `r >= 0`.
///
/// The direction is not normalized: for a ray built with
/// [`Ray::segment`], `r` in `[0, 1]` spans exactly the segment.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray.
    pub direction: Vec3,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let inv = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        let sign = [
            usize::from(inv.x < 0.0),
            usize::from(inv.y < 0.0),
            usize::from(inv.z < 0.0),
        ];
        Self {
            origin,
            direction,
            inv_direction: inv,
            sign,
        }
    }

    /// Ray from `from` through `to`; `r = 1` lands on `to`.
    pub fn segment(from: Point3, to: Point3) -> Self {
        Self::new(from, to - from)
    }

    /// Unit ray from `origin` towards the observer.
    pub fn toward_observer(origin: Point3) -> Self {
        Self::new(origin, toward_observer())
    }

    /// Evaluate the ray at parameter `r`.
    #[inline]
    pub fn at(&self, r: f64) -> Point3 {
        self.origin + r * self.direction
    }

    /// Test ray-AABB intersection using the slab method.
    ///
    /// Returns `Some((r_min, r_max))` with the entry and exit parameters,
    /// clamped to `r >= 0`, or `None` if the ray misses the box.
    ///
    /// Axis-parallel rays give `0 * inf = NaN` slab bounds when the origin
    /// lies on a slab plane; `f64::max`/`min` drop the NaN.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(f64, f64)> {
        let bounds = [aabb.min, aabb.max];

        let tx1 = (bounds[self.sign[0]].x - self.origin.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - self.sign[0]].x - self.origin.x) * self.inv_direction.x;

        let mut r_min = tx1;
        let mut r_max = tx2;

        let ty1 = (bounds[self.sign[1]].y - self.origin.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - self.sign[1]].y - self.origin.y) * self.inv_direction.y;

        r_min = r_min.max(ty1);
        r_max = r_max.min(ty2);

        let tz1 = (bounds[self.sign[2]].z - self.origin.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - self.sign[2]].z - self.origin.z) * self.inv_direction.z;

        r_min = r_min.max(tz1);
        r_max = r_max.min(tz2);

        if r_max >= r_min && r_max >= 0.0 {
            Some((r_min.max(0.0), r_max))
        } else {
            None
        }
    }
}
