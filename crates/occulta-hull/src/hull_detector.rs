//! Eclipse detection by point-in-hull tests against front bodies.

use occulta_math::Point2;
use occulta_mesh::{
    flatten_mut, Body, EclipseDetector, HorizonClassifier, Mesh, Result, Visibility,
    VisibilityCounts,
};

use crate::ordering::{front_to_back, DepthPolicy};
use crate::polygon::ConvexPolygon;

/// Eclipse detector for convex bodies using the projected hull of each
/// front body.
///
/// Starts from the horizon baseline, orders the bodies front to back, and
/// for every pair tests the elements of the back body against the convex
/// hull of the front body's visible outline. An element whose center and
/// three vertices all fall inside the hull is hidden, one with none inside
/// is left as it was, anything in between is partial.
///
/// Only back bodies are modified. A body that is itself concave or that
/// wraps around another is not handled; use the ray detector for those.
#[derive(Debug, Clone, Copy, Default)]
pub struct HullEclipseDetector {
    depth_policy: DepthPolicy,
}

impl HullEclipseDetector {
    /// Detector ordering bodies with `depth_policy`.
    pub fn new(depth_policy: DepthPolicy) -> Self {
        Self { depth_policy }
    }

    /// The body ordering policy.
    pub fn depth_policy(&self) -> DepthPolicy {
        self.depth_policy
    }

    /// Classify every element of `bodies`. Returns whether any element is
    /// partial afterwards.
    pub fn detect(&self, bodies: &mut [Body]) -> Result<bool> {
        HorizonClassifier::new().classify(bodies)?;

        let mut leaves = flatten_mut(bodies);
        let order = front_to_back(
            leaves.iter().map(|l| (l.name, &*l.mesh)),
            self.depth_policy,
        );
        // Hulls come from the horizon baseline, before any pair runs
        let hulls: Vec<Option<ConvexPolygon>> =
            leaves.iter().map(|l| front_hull(&*l.mesh)).collect();

        for (k, &front) in order.iter().enumerate() {
            let Some(hull) = &hulls[front] else {
                continue;
            };
            for &back in &order[k + 1..] {
                let changed = eclipse_by_hull(&mut *leaves[back].mesh, hull);
                log::trace!(
                    "hull: '{}' ({} hull vertices) in front of '{}': {} elements changed",
                    leaves[front].name,
                    hull.len(),
                    leaves[back].name,
                    changed
                );
            }
        }

        let mut counts = VisibilityCounts::default();
        for leaf in &leaves {
            for e in leaf.mesh.iter() {
                counts.add(e.visibility());
            }
        }
        log::debug!(
            "hull eclipse ({} faces): {} hidden, {} visible, {} partial",
            counts.total(),
            counts.hidden,
            counts.visible,
            counts.partial
        );
        Ok(counts.partial > 0)
    }
}

/// Hull of the centers and vertices of the visible elements of `mesh`, or
/// `None` if nothing is visible.
fn front_hull(mesh: &Mesh) -> Option<ConvexPolygon> {
    let points: Vec<Point2> = mesh
        .iter()
        .filter(|e| e.visibility().is_visible())
        .flat_map(|e| {
            let [a, b, c] = e.projected_vertices();
            [e.projected_center(), a, b, c]
        })
        .collect();
    if points.is_empty() {
        None
    } else {
        Some(ConvexPolygon::from_points(&points))
    }
}

/// Classify the non-hidden elements of `back` against `hull`, keeping the
/// more severe of the old and new state. Returns how many changed.
fn eclipse_by_hull(back: &mut Mesh, hull: &ConvexPolygon) -> usize {
    let mut changed = 0;
    for e in back.iter_mut().filter(|e| !e.is_hidden()) {
        let [a, b, c] = e.projected_vertices();
        let samples = [e.projected_center(), a, b, c];
        let inside = samples.iter().filter(|p| hull.contains(p)).count();
        let v = e
            .visibility()
            .merge(Visibility::from_coverage(inside, samples.len()));
        if v != e.visibility() {
            e.set_visibility(v);
            changed += 1;
        }
    }
    changed
}

impl EclipseDetector for HullEclipseDetector {
    fn name(&self) -> &'static str {
        "convex_hull"
    }

    fn detect(&self, bodies: &mut [Body]) -> Result<bool> {
        HullEclipseDetector::detect(self, bodies)
    }
}
