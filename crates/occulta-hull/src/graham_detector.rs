//! Eclipse detection with monotone-chain hulls and a boundary band query.

use occulta_math::{point_segment_distance, Point2};
use occulta_mesh::{
    flatten_mut, Body, EclipseDetector, HorizonClassifier, Mesh, Result, Visibility,
    VisibilityCounts,
};

use crate::graham::GrahamHull;
use crate::kdtree::KdTree;
use crate::ordering::{front_to_back, DepthPolicy};

/// Edge length of an equilateral triangle of unit area.
const EQUILATERAL_EDGE: f64 = 1.519_671_371_303_185_8; // 2 / 3^(1/4)

/// Upper bound on the boundary samples of one band query.
const MAX_BOUNDARY_SAMPLES: usize = 4096;

/// Fastest eclipse detector, approximate near the hull boundary.
///
/// Bodies are ordered front to back as for [`HullEclipseDetector`]. For
/// each pair the back body's elements are first classified by how many of
/// their three vertices fall strictly inside the front hull. A second pass
/// then marks as partial every element whose center lies within a band of
/// the hull boundary, catching occlusion that falls between vertices. The
/// band is `distance_factor` times the edge of an equilateral triangle with
/// the back body's smallest element area.
///
/// Elements already hidden are never downgraded to partial by the band.
///
/// Containment is strict, so vertices lying exactly on the front hull
/// count as outside. A back body whose limb coincides with the front
/// body's outline (equal radii, concentric) therefore keeps a ring of
/// partial elements along that limb where the exact answer is hidden.
///
/// [`HullEclipseDetector`]: crate::HullEclipseDetector
#[derive(Debug, Clone, Copy)]
pub struct GrahamRangeEclipseDetector {
    distance_factor: f64,
    depth_policy: DepthPolicy,
}

impl Default for GrahamRangeEclipseDetector {
    fn default() -> Self {
        Self::new(1.0, DepthPolicy::default())
    }
}

impl GrahamRangeEclipseDetector {
    /// Detector with the given band scale and body ordering. A factor of
    /// zero disables the boundary pass.
    pub fn new(distance_factor: f64, depth_policy: DepthPolicy) -> Self {
        Self {
            distance_factor,
            depth_policy,
        }
    }

    /// Scale of the boundary band.
    pub fn distance_factor(&self) -> f64 {
        self.distance_factor
    }

    /// The body ordering policy.
    pub fn depth_policy(&self) -> DepthPolicy {
        self.depth_policy
    }

    /// Classify every element of `bodies`. Returns whether any element of a
    /// back body was found eclipsed, partially or fully.
    pub fn detect(&self, bodies: &mut [Body]) -> Result<bool> {
        HorizonClassifier::new().classify(bodies)?;

        let mut leaves = flatten_mut(bodies);
        let order = front_to_back(
            leaves.iter().map(|l| (l.name, &*l.mesh)),
            self.depth_policy,
        );
        let hulls: Vec<Option<GrahamHull>> =
            leaves.iter().map(|l| front_hull(&*l.mesh)).collect();

        let mut detected = false;
        for (k, &front) in order.iter().enumerate() {
            let Some(hull) = &hulls[front] else {
                continue;
            };
            for &back in &order[k + 1..] {
                let mesh = &mut *leaves[back].mesh;
                let eclipsed = eclipse_by_vertices(mesh, hull);
                let band = self.band_width(mesh);
                let banded = mark_boundary_band(mesh, hull, band);
                detected |= eclipsed > 0 || banded > 0;
                log::trace!(
                    "graham: '{}' in front of '{}': {} eclipsed by vertices, {} in band {:.3e}",
                    leaves[front].name,
                    leaves[back].name,
                    eclipsed,
                    banded,
                    band
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
            "graham eclipse ({} faces): {} hidden, {} visible, {} partial",
            counts.total(),
            counts.hidden,
            counts.visible,
            counts.partial
        );
        Ok(detected)
    }

    fn band_width(&self, back: &Mesh) -> f64 {
        back.min_size()
            .map_or(0.0, |size| self.distance_factor * EQUILATERAL_EDGE * size.max(0.0).sqrt())
    }
}

/// Hull of the vertices of the visible elements of `mesh`.
fn front_hull(mesh: &Mesh) -> Option<GrahamHull> {
    let points: Vec<Point2> = mesh
        .iter()
        .filter(|e| e.visibility().is_visible())
        .flat_map(|e| e.projected_vertices())
        .collect();
    let hull = GrahamHull::from_points(&points);
    (!hull.is_empty()).then_some(hull)
}

/// Vertex pass. Returns how many non-hidden elements had at least one
/// vertex inside the hull.
fn eclipse_by_vertices(back: &mut Mesh, hull: &GrahamHull) -> usize {
    let mut eclipsed = 0;
    for e in back.iter_mut().filter(|e| !e.is_hidden()) {
        let vertices = e.projected_vertices();
        let inside = vertices.iter().filter(|p| hull.contains(p)).count();
        let verdict = Visibility::from_coverage(inside, vertices.len());
        if verdict != Visibility::Visible {
            e.set_visibility(e.visibility().merge(verdict));
            eclipsed += 1;
        }
    }
    eclipsed
}

/// Band pass. Marks as partial every non-hidden element whose projected
/// center is within `width` of the hull boundary; returns how many matched.
fn mark_boundary_band(back: &mut Mesh, hull: &GrahamHull, width: f64) -> usize {
    if !(width > 0.0 && width.is_finite()) {
        return 0;
    }
    let tree = KdTree::build(
        back.iter()
            .enumerate()
            .filter(|(_, e)| !e.is_hidden())
            .map(|(i, e)| (i, e.projected_center())),
    );
    if tree.is_empty() {
        return 0;
    }

    // Samples are at most `spacing` apart, so any point within `width` of
    // an edge is within `hypot(width, spacing / 2)` of some sample
    let spacing = sample_spacing(hull, width);
    let reach = width.hypot(0.5 * spacing);
    let mut candidates = vec![false; back.len()];
    for s in hull.boundary_samples(spacing) {
        tree.for_each_within(&s, reach, |id| candidates[id] = true);
    }

    let edges = hull.edges();
    let vertices = hull.vertices();
    let mut matched = 0;
    for (e, _) in back
        .iter_mut()
        .zip(candidates)
        .filter(|(_, candidate)| *candidate)
    {
        if boundary_distance(&e.projected_center(), &edges, &vertices) <= width {
            e.set_visibility(e.visibility().merge(Visibility::Partial));
            matched += 1;
        }
    }
    matched
}

/// Spacing of the boundary samples for a band of `width`, widened so that
/// one query takes at most about `MAX_BOUNDARY_SAMPLES` samples.
fn sample_spacing(hull: &GrahamHull, width: f64) -> f64 {
    width.max(hull.perimeter() / MAX_BOUNDARY_SAMPLES as f64)
}

fn boundary_distance(p: &Point2, edges: &[(Point2, Point2)], vertices: &[Point2]) -> f64 {
    if edges.is_empty() {
        return vertices
            .iter()
            .map(|v| (p - v).norm())
            .fold(f64::INFINITY, f64::min);
    }
    edges
        .iter()
        .map(|(a, b)| point_segment_distance(p, a, b))
        .fold(f64::INFINITY, f64::min)
}

impl EclipseDetector for GrahamRangeEclipseDetector {
    fn name(&self) -> &'static str {
        "graham"
    }

    fn detect(&self, bodies: &mut [Body]) -> Result<bool> {
        GrahamRangeEclipseDetector::detect(self, bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use occulta_math::Point3;
    use occulta_mesh::fixtures::{facing_triangle, uv_sphere};
    use occulta_mesh::{EclipseError, Element};

    fn sphere(x: f64, y: f64, z: f64, radius: f64) -> Mesh {
        uv_sphere(Point3::new(x, y, z), radius, 12, 24)
    }

    fn horizon(mesh: Mesh) -> Vec<Visibility> {
        let mut bodies = vec![Body::leaf("alone", mesh)];
        HorizonClassifier::new().classify(&mut bodies).unwrap();
        bodies[0].mesh().unwrap().visibilities()
    }

    // Big front triangle covering x > 0, y > 0, x + y < 4, and a back body
    // with one element just left of the x = 0 edge and one just inside it.
    fn edge_scene() -> Vec<Body> {
        edge_scene_with(Vec::new())
    }

    fn edge_scene_with(extra: Vec<Element>) -> Vec<Body> {
        let front = Mesh::new(vec![facing_triangle(0.0, 0.0, 0.0, 4.0)]);
        let mut back = vec![
            facing_triangle(-0.35, 1.0, 5.0, 0.3),
            facing_triangle(0.05, 1.0, 5.0, 0.3),
        ];
        back.extend(extra);
        vec![Body::leaf("front", front), Body::leaf("back", Mesh::new(back))]
    }

    #[test]
    fn test_band_constant() {
        assert_relative_eq!(EQUILATERAL_EDGE, 2.0 / 3.0_f64.powf(0.25), epsilon = 1e-15);
        // An equilateral triangle with this edge has unit area
        assert_relative_eq!(3.0_f64.sqrt() / 4.0 * EQUILATERAL_EDGE.powi(2), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_body_list() {
        assert_eq!(
            GrahamRangeEclipseDetector::default().detect(&mut []).unwrap_err(),
            EclipseError::EmptyBodyList
        );
    }

    #[test]
    fn test_single_body_is_horizon() {
        let mut bodies = vec![Body::leaf("star", sphere(0.0, 0.0, 0.0, 1.0))];
        let detected = GrahamRangeEclipseDetector::default().detect(&mut bodies).unwrap();
        assert!(!detected);
        assert_eq!(
            bodies[0].mesh().unwrap().visibilities(),
            horizon(sphere(0.0, 0.0, 0.0, 1.0))
        );
    }

    #[test]
    fn test_concentric_back_sphere_hidden() {
        let mut bodies = vec![
            Body::leaf("front", sphere(0.0, 0.0, 0.0, 1.0)),
            Body::leaf("back", sphere(0.0, 0.0, 6.0, 0.9)),
        ];
        let detected = GrahamRangeEclipseDetector::default().detect(&mut bodies).unwrap();
        assert!(detected);
        assert_eq!(bodies[1].mesh().unwrap().counts().hidden, bodies[1].element_count());
        assert_eq!(
            bodies[0].mesh().unwrap().visibilities(),
            horizon(sphere(0.0, 0.0, 0.0, 1.0))
        );
    }

    #[test]
    fn test_separated_spheres_unchanged() {
        let mut bodies = vec![
            Body::leaf("a", sphere(0.0, 0.0, 0.0, 1.0)),
            Body::leaf("b", sphere(5.0, 0.0, 4.0, 1.0)),
        ];
        let detected = GrahamRangeEclipseDetector::default().detect(&mut bodies).unwrap();
        assert!(!detected);
        assert_eq!(
            bodies[1].mesh().unwrap().visibilities(),
            horizon(sphere(5.0, 0.0, 4.0, 1.0))
        );
    }

    #[test]
    fn test_partial_overlap_band_only_adds_partials() {
        let scene = || {
            vec![
                Body::leaf("front", sphere(0.0, 0.0, 0.0, 1.0)),
                Body::leaf("back", sphere(1.0, 0.0, 5.0, 1.0)),
            ]
        };
        let mut banded = scene();
        let mut vertex_only = scene();
        assert!(GrahamRangeEclipseDetector::default().detect(&mut banded).unwrap());
        assert!(GrahamRangeEclipseDetector::new(0.0, DepthPolicy::FirstElement)
            .detect(&mut vertex_only)
            .unwrap());

        let with_band = banded[1].mesh().unwrap().counts();
        let without = vertex_only[1].mesh().unwrap().counts();
        assert!(without.partial > 0);
        assert!(with_band.visible > 0);
        assert!(with_band.hidden > with_band.total() / 2);
        assert_eq!(with_band.hidden, without.hidden);
        assert!(with_band.partial >= without.partial);
    }

    #[test]
    fn test_band_marks_element_outside_hull() {
        let mut bodies = edge_scene();
        let detected = GrahamRangeEclipseDetector::default().detect(&mut bodies).unwrap();
        assert!(detected);
        assert_eq!(
            bodies[1].mesh().unwrap().visibilities(),
            vec![Visibility::Partial, Visibility::Hidden]
        );
        assert_eq!(
            bodies[0].mesh().unwrap().visibilities(),
            vec![Visibility::Visible]
        );
    }

    #[test]
    fn test_zero_factor_skips_band() {
        let mut bodies = edge_scene();
        GrahamRangeEclipseDetector::new(0.0, DepthPolicy::FirstElement)
            .detect(&mut bodies)
            .unwrap();
        // The inside element is still hidden by its vertices
        assert_eq!(
            bodies[1].mesh().unwrap().visibilities(),
            vec![Visibility::Visible, Visibility::Hidden]
        );
    }

    #[test]
    fn test_nothing_in_band_is_not_detected() {
        let front = Mesh::new(vec![facing_triangle(0.0, 0.0, 0.0, 4.0)]);
        let back = Mesh::new(vec![facing_triangle(-2.0, 1.0, 5.0, 0.3)]);
        let mut bodies = vec![Body::leaf("front", front), Body::leaf("back", back)];
        let detected = GrahamRangeEclipseDetector::default().detect(&mut bodies).unwrap();
        assert!(!detected);
        assert_eq!(
            bodies[1].mesh().unwrap().visibilities(),
            vec![Visibility::Visible]
        );
    }

    #[test]
    fn test_zero_area_element_keeps_band() {
        let line = Element::from_vertices(
            Point3::new(10.0, 10.0, 5.0),
            Point3::new(11.0, 10.0, 5.0),
            Point3::new(12.0, 10.0, 5.0),
        );
        let mut bodies = edge_scene_with(vec![line]);
        assert!(GrahamRangeEclipseDetector::default().detect(&mut bodies).unwrap());
        assert_eq!(
            bodies[1].mesh().unwrap().visibilities(),
            vec![Visibility::Partial, Visibility::Hidden, Visibility::Hidden]
        );
    }

    #[test]
    fn test_sliver_element_narrows_band() {
        let mut bodies = edge_scene_with(vec![facing_triangle(3.0, 3.0, 5.0, 1e-9)]);
        assert!(GrahamRangeEclipseDetector::default().detect(&mut bodies).unwrap());
        // The band shrinks to the sliver's scale and no longer reaches the
        // outside element
        assert_eq!(
            bodies[1].mesh().unwrap().visibilities(),
            vec![Visibility::Visible, Visibility::Hidden, Visibility::Visible]
        );
    }

    #[test]
    fn test_sample_count_is_capped() {
        let hull = GrahamHull::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 4.0),
            Point2::new(4.0, 0.0),
        ]);
        assert_relative_eq!(sample_spacing(&hull, 0.5), 0.5);
        let spacing = sample_spacing(&hull, 1e-9);
        assert_relative_eq!(spacing, hull.perimeter() / MAX_BOUNDARY_SAMPLES as f64);
        let samples = hull.boundary_samples(spacing);
        assert!(samples.len() >= MAX_BOUNDARY_SAMPLES - 3);
        assert!(samples.len() <= MAX_BOUNDARY_SAMPLES + 6);
    }

    #[test]
    fn test_boundary_distance_of_point_hull() {
        let vertices = [Point2::new(1.0, 1.0)];
        assert_relative_eq!(boundary_distance(&Point2::new(4.0, 5.0), &[], &vertices), 5.0);
    }
}
