//! Point-to-point obstruction queries against a third body.

use occulta_math::{Aabb3, Point3, Tolerance};
use occulta_mesh::{Body, Mesh};
use rayon::prelude::*;

use crate::intersect::intersect_triangle;
use crate::ray::Ray;

/// Tests whether straight segments are blocked by the surface of a body.
///
/// Independent of the visibility pipeline: no flags are read or written.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineOfSightTester {
    tolerance: Tolerance,
}

// One leaf mesh with its bounding box.
struct Occluder<'a> {
    bounds: Aabb3,
    mesh: &'a Mesh,
}

impl LineOfSightTester {
    /// Tester using `tolerance` for the ray/plane parallelism test.
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// For each target, whether the segment `origin -> target` crosses any
    /// element of `occluder` (every leaf of a composite is tested).
    ///
    /// Degenerate and coplanar elements never obstruct.
    pub fn is_obstructed(&self, origin: &Point3, targets: &[Point3], occluder: &Body) -> Vec<bool> {
        let occluders: Vec<Occluder<'_>> = occluder
            .leaves()
            .into_iter()
            .filter(|leaf| !leaf.mesh.is_empty())
            .map(|leaf| {
                let mut bounds = Aabb3::empty();
                for e in leaf.mesh.iter() {
                    for v in e.triangle() {
                        bounds.include_point(v);
                    }
                }
                bounds.expand(self.tolerance.linear);
                Occluder {
                    bounds,
                    mesh: leaf.mesh,
                }
            })
            .collect();

        let obstructed: Vec<bool> = targets
            .par_iter()
            .map(|target| self.segment_blocked(origin, target, &occluders))
            .collect();

        log::trace!(
            "line of sight: {}/{} segments obstructed by '{}'",
            obstructed.iter().filter(|&&b| b).count(),
            targets.len(),
            occluder.name()
        );
        obstructed
    }

    fn segment_blocked(&self, origin: &Point3, target: &Point3, occluders: &[Occluder<'_>]) -> bool {
        let ray = Ray::segment(*origin, *target);
        occluders.iter().any(|occ| {
            match ray.intersect_aabb(&occ.bounds) {
                Some((r_min, _)) if r_min <= 1.0 => {}
                _ => return false,
            }
            occ.mesh.iter().any(|e| {
                intersect_triangle(&ray, e.triangle(), &self.tolerance)
                    .blocks_within(f64::NEG_INFINITY, 1.0)
            })
        })
    }
}
