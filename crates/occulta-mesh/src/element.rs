//! Surface elements and their visibility state.

use occulta_math::{depth, project, toward_observer, Point2, Point3, Vec3};
use serde::{Deserialize, Serialize};

/// Visibility of one surface element as seen by the observer.
///
/// Exactly one state holds per element. The derived ordering is the
/// severity order `Visible < Partial < Hidden`, used when the verdicts of
/// several occluders are combined.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Nothing blocks the element.
    #[default]
    Visible,
    /// Some, but not all, of the element is blocked.
    Partial,
    /// The element is completely blocked.
    Hidden,
}

impl Visibility {
    /// Verdict for an element of which `covered` out of `samples` sample
    /// points are blocked.
    pub fn from_coverage(covered: usize, samples: usize) -> Self {
        if covered == 0 {
            Visibility::Visible
        } else if covered >= samples {
            Visibility::Hidden
        } else {
            Visibility::Partial
        }
    }

    /// Combine two verdicts, keeping the more severe one.
    #[inline]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }

    /// True for [`Visibility::Visible`].
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }

    /// True for [`Visibility::Partial`].
    pub fn is_partial(self) -> bool {
        self == Visibility::Partial
    }

    /// True for [`Visibility::Hidden`].
    pub fn is_hidden(self) -> bool {
        self == Visibility::Hidden
    }
}

/// One mesh triangle in the observer's frame.
///
/// Geometry is fixed at construction; only the visibility changes, and
/// only through the detectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    triangle: [Point3; 3],
    center: Point3,
    normal: Vec3,
    mu: f64,
    size: f64,
    visibility: Visibility,
}

impl Element {
    /// Create an element from precomputed geometry.
    ///
    /// `mu` is the cosine between `normal` and the direction towards the
    /// observer; `size` is the element's area.
    pub fn new(triangle: [Point3; 3], center: Point3, normal: Vec3, mu: f64, size: f64) -> Self {
        Self {
            triangle,
            center,
            normal,
            mu,
            size,
            visibility: Visibility::Visible,
        }
    }

    /// Create an element from its three vertices, deriving the centroid,
    /// the right-handed unit normal, the area and `mu`.
    ///
    /// A degenerate triangle gets a zero normal, zero area and `mu = 0`.
    pub fn from_vertices(v0: Point3, v1: Point3, v2: Point3) -> Self {
        let n = (v1 - v0).cross(&(v2 - v0));
        let len = n.norm();
        let center = Point3::from((v0.coords + v1.coords + v2.coords) / 3.0);
        let (normal, size) = if len > 0.0 {
            (n / len, 0.5 * len)
        } else {
            (Vec3::zeros(), 0.0)
        };
        let mu = normal.dot(&toward_observer());
        Self::new([v0, v1, v2], center, normal, mu, size)
    }

    /// The three vertices.
    pub fn triangle(&self) -> &[Point3; 3] {
        &self.triangle
    }

    /// Center point.
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Unit normal.
    pub fn normal(&self) -> &Vec3 {
        &self.normal
    }

    /// Cosine between the normal and the direction to the observer.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Area.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Area projected onto the sky plane.
    pub fn projected_size(&self) -> f64 {
        self.size * self.mu.abs()
    }

    /// Depth of the center along the line of sight.
    pub fn depth(&self) -> f64 {
        depth(&self.center)
    }

    /// Center projected onto the sky plane.
    pub fn projected_center(&self) -> Point2 {
        project(&self.center)
    }

    /// Vertices projected onto the sky plane.
    pub fn projected_vertices(&self) -> [Point2; 3] {
        [
            project(&self.triangle[0]),
            project(&self.triangle[1]),
            project(&self.triangle[2]),
        ]
    }

    /// Current visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Overwrite the visibility.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    /// Shorthand for `visibility().is_hidden()`.
    pub fn is_hidden(&self) -> bool {
        self.visibility.is_hidden()
    }
}
