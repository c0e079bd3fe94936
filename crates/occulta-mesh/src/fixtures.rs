//! Test meshes.
//!
//! Only built with the `fixtures` feature (and for this crate's own tests).
//! Real meshes come from the mesh-generation collaborator.

use std::f64::consts::PI;

use occulta_math::Point3;

use crate::element::Element;
use crate::mesh::Mesh;

/// Latitude/longitude sphere with poles on the line of sight.
///
/// `stacks` latitude bands, `slices` longitude sectors; every triangle is
/// wound so its normal points outwards.
pub fn uv_sphere(center: Point3, radius: f64, stacks: usize, slices: usize) -> Mesh {
    let stacks = stacks.max(2);
    let slices = slices.max(3);

    let vertex = |i: usize, j: usize| -> Point3 {
        let theta = PI * i as f64 / stacks as f64;
        let phi = 2.0 * PI * (j % slices) as f64 / slices as f64;
        Point3::new(
            center.x + radius * theta.sin() * phi.cos(),
            center.y + radius * theta.sin() * phi.sin(),
            center.z + radius * theta.cos(),
        )
    };

    let mut elements = Vec::with_capacity(2 * stacks * slices);
    for i in 0..stacks {
        for j in 0..slices {
            let a = vertex(i, j);
            let b = vertex(i + 1, j);
            let c = vertex(i + 1, j + 1);
            let d = vertex(i, j + 1);
            if i != stacks - 1 {
                elements.push(outward(center, a, b, c));
            }
            if i != 0 {
                elements.push(outward(center, a, c, d));
            }
        }
    }
    Mesh::new(elements)
}

/// A single triangle lying in the plane `z = depth`, facing the observer.
pub fn facing_triangle(x: f64, y: f64, depth: f64, scale: f64) -> Element {
    Element::from_vertices(
        Point3::new(x, y, depth),
        Point3::new(x, y + scale, depth),
        Point3::new(x + scale, y, depth),
    )
}

fn outward(center: Point3, a: Point3, b: Point3, c: Point3) -> Element {
    let e = Element::from_vertices(a, b, c);
    if e.normal().dot(&(e.center() - center)) < 0.0 {
        Element::from_vertices(a, c, b)
    } else {
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_normals_point_outward() {
        let center = Point3::new(1.0, -2.0, 3.0);
        let mesh = uv_sphere(center, 2.0, 8, 16);
        assert_eq!(mesh.len(), 2 * 8 * 16 - 2 * 16);
        for e in mesh.iter() {
            assert!(e.normal().dot(&(e.center() - center)) > 0.0);
        }
    }

    #[test]
    fn test_sphere_area_converges() {
        let mesh = uv_sphere(Point3::origin(), 1.0, 32, 64);
        let area: f64 = mesh.iter().map(Element::size).sum();
        assert_relative_eq!(area, 4.0 * PI, max_relative = 0.01);
    }

    #[test]
    fn test_facing_triangle() {
        let e = facing_triangle(0.0, 0.0, 5.0, 2.0);
        assert_relative_eq!(e.mu(), 1.0);
        assert_relative_eq!(e.size(), 2.0);
    }
}
