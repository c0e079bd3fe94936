//! Exact eclipse detection by casting rays towards the observer.

use std::f64::consts::PI;

use occulta_math::{project, Aabb2, Point3, Tolerance};
use occulta_mesh::{Body, EclipseDetector, Element, Result, Visibility, WorkingSet};
use rayon::prelude::*;

use crate::grid::ProjectedGrid;
use crate::intersect::intersect_triangle;
use crate::ray::Ray;

/// Rays per element: the center and the three vertices.
const SAMPLES: usize = 4;

/// Reference eclipse detector.
///
/// Every element casts one ray towards the observer from its center and
/// from each vertex. A ray is blocked when it crosses an element that lies
/// strictly in front of the tested one in the depth order. All four rays
/// blocked makes the element hidden, some blocked makes it partial.
///
/// Self-occlusion is found the same way as mutual eclipses, so this
/// detector does not need the horizon baseline: the back half of a convex
/// body is hidden behind its front half, and elements straddling the
/// horizon come out partial.
#[derive(Debug, Clone, Copy)]
pub struct RayEclipseDetector {
    threshold: f64,
    tolerance: Tolerance,
}

impl RayEclipseDetector {
    /// Detector with the given backface threshold (radians) and tolerance.
    ///
    /// Occluders whose normal makes an angle larger than `threshold` with
    /// the direction towards the observer are skipped. Any threshold of
    /// `PI` or more tests every occluder.
    pub fn new(threshold: f64, tolerance: Tolerance) -> Self {
        Self {
            threshold,
            tolerance,
        }
    }

    /// Backface threshold in radians.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Intersection tolerance.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Classify every element of `bodies`.
    ///
    /// Returns whether any element ended up partial.
    pub fn detect(&self, bodies: &mut [Body]) -> Result<bool> {
        let mut set = WorkingSet::gather(bodies)?;
        let n = set.len();

        let boxes: Vec<Aabb2> = (0..n)
            .map(|position| {
                let mut b = Aabb2::from_points(&set.sorted(position).projected_vertices());
                b.expand(self.tolerance.linear);
                b
            })
            .collect();
        let grid = ProjectedGrid::build(&boxes);

        // mu below this means the occluder faces too far away to be tested
        let min_mu = (self.threshold < PI).then(|| self.threshold.cos());

        let verdicts: Vec<Visibility> = {
            let set = &set;
            let grid = &grid;
            (0..n)
                .into_par_iter()
                .map(|position| self.classify(set, grid, position, min_mu))
                .collect()
        };

        set.assign_front_to_back(&verdicts)?;
        set.scatter(bodies)?;

        let counts = set.counts();
        log::debug!(
            "ray eclipse ({} faces): {} hidden, {} visible, {} partial",
            counts.total(),
            counts.hidden,
            counts.visible,
            counts.partial
        );
        Ok(counts.partial > 0)
    }

    fn classify(
        &self,
        set: &WorkingSet,
        grid: &ProjectedGrid,
        position: usize,
        min_mu: Option<f64>,
    ) -> Visibility {
        let element = set.sorted(position);
        let tri = element.triangle();
        let samples: [&Point3; SAMPLES] = [element.center(), &tri[0], &tri[1], &tri[2]];

        let covered = samples
            .iter()
            .filter(|p| self.is_blocked(set, grid, p, position, min_mu))
            .count();
        Visibility::from_coverage(covered, SAMPLES)
    }

    fn is_blocked(
        &self,
        set: &WorkingSet,
        grid: &ProjectedGrid,
        p: &Point3,
        position: usize,
        min_mu: Option<f64>,
    ) -> bool {
        let ray = Ray::toward_observer(*p);
        let footprint = project(p);
        let blocked = grid.query_below(&footprint, position).any(|q| {
            let occluder: &Element = set.sorted(q);
            if min_mu.is_some_and(|m| occluder.mu() < m) {
                return false;
            }
            intersect_triangle(&ray, occluder.triangle(), &self.tolerance)
                .blocks_within(self.tolerance.linear, f64::INFINITY)
        });
        blocked
    }
}

impl Default for RayEclipseDetector {
    fn default() -> Self {
        Self::new(1.25 * PI, Tolerance::DEFAULT)
    }
}

impl EclipseDetector for RayEclipseDetector {
    fn name(&self) -> &'static str {
        "ray_trace"
    }

    fn detect(&self, bodies: &mut [Body]) -> Result<bool> {
        RayEclipseDetector::detect(self, bodies)
    }
}
