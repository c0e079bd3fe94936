//! Bodies: single meshes or composite trees of bodies.

use crate::mesh::Mesh;

/// A body in the scene.
///
/// A leaf owns exactly one mesh. A composite (a "body bag", e.g. a binary
/// system) owns an ordered list of child bodies and no mesh of its own.
/// Traversal always goes through the leaves in depth-first order.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A single body with a surface mesh.
    Leaf {
        /// Body name, used in diagnostics.
        name: String,
        /// Surface mesh.
        mesh: Mesh,
    },
    /// An ordered collection of bodies.
    Composite {
        /// Composite name, used in diagnostics.
        name: String,
        /// Child bodies.
        children: Vec<Body>,
    },
}

/// Borrowed view of one leaf body.
#[derive(Debug, Clone, Copy)]
pub struct Leaf<'a> {
    /// Body name.
    pub name: &'a str,
    /// Surface mesh.
    pub mesh: &'a Mesh,
}

/// Mutable view of one leaf body.
#[derive(Debug)]
pub struct LeafMut<'a> {
    /// Body name.
    pub name: &'a str,
    /// Surface mesh.
    pub mesh: &'a mut Mesh,
}

impl Body {
    /// Create a leaf body.
    pub fn leaf(name: impl Into<String>, mesh: Mesh) -> Self {
        Body::Leaf {
            name: name.into(),
            mesh,
        }
    }

    /// Create a composite body.
    pub fn composite(name: impl Into<String>, children: Vec<Body>) -> Self {
        Body::Composite {
            name: name.into(),
            children,
        }
    }

    /// Name of this body.
    pub fn name(&self) -> &str {
        match self {
            Body::Leaf { name, .. } | Body::Composite { name, .. } => name,
        }
    }

    /// The mesh of a leaf, `None` for a composite.
    pub fn mesh(&self) -> Option<&Mesh> {
        match self {
            Body::Leaf { mesh, .. } => Some(mesh),
            Body::Composite { .. } => None,
        }
    }

    /// The mesh of a leaf, mutably.
    pub fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        match self {
            Body::Leaf { mesh, .. } => Some(mesh),
            Body::Composite { .. } => None,
        }
    }

    /// Children of a composite; empty for a leaf.
    pub fn children(&self) -> &[Body] {
        match self {
            Body::Leaf { .. } => &[],
            Body::Composite { children, .. } => children,
        }
    }

    /// True for a composite.
    pub fn is_composite(&self) -> bool {
        matches!(self, Body::Composite { .. })
    }

    /// All leaves below (and including) this body, depth-first.
    pub fn leaves(&self) -> Vec<Leaf<'_>> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    /// Total number of elements over all leaves.
    pub fn element_count(&self) -> usize {
        match self {
            Body::Leaf { mesh, .. } => mesh.len(),
            Body::Composite { children, .. } => children.iter().map(Body::element_count).sum(),
        }
    }

    /// Find a body by name, searching depth-first.
    pub fn find(&self, name: &str) -> Option<&Body> {
        if self.name() == name {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(name))
    }
}

/// All leaves of `bodies`, depth-first, in order.
pub fn flatten(bodies: &[Body]) -> Vec<Leaf<'_>> {
    let mut out = Vec::new();
    for body in bodies {
        collect_leaves(body, &mut out);
    }
    out
}

/// All leaves of `bodies`, mutably, in the same order as [`flatten`].
pub fn flatten_mut(bodies: &mut [Body]) -> Vec<LeafMut<'_>> {
    let mut out = Vec::new();
    for body in bodies.iter_mut() {
        collect_leaves_mut(body, &mut out);
    }
    out
}

fn collect_leaves<'a>(body: &'a Body, out: &mut Vec<Leaf<'a>>) {
    match body {
        Body::Leaf { name, mesh } => out.push(Leaf { name, mesh }),
        Body::Composite { children, .. } => {
            for child in children {
                collect_leaves(child, out);
            }
        }
    }
}

fn collect_leaves_mut<'a>(body: &'a mut Body, out: &mut Vec<LeafMut<'a>>) {
    match body {
        Body::Leaf { name, mesh } => {
            let name: &'a String = name;
            out.push(LeafMut { name, mesh });
        }
        Body::Composite { children, .. } => {
            for child in children.iter_mut() {
                collect_leaves_mut(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use occulta_math::Point3;

    fn tiny_mesh(n: usize) -> Mesh {
        (0..n)
            .map(|i| {
                let z = i as f64;
                Element::from_vertices(
                    Point3::new(0.0, 0.0, z),
                    Point3::new(0.0, 1.0, z),
                    Point3::new(1.0, 0.0, z),
                )
            })
            .collect()
    }

    fn system() -> Vec<Body> {
        vec![
            Body::composite(
                "binary",
                vec![
                    Body::leaf("primary", tiny_mesh(3)),
                    Body::composite("inner", vec![Body::leaf("secondary", tiny_mesh(2))]),
                ],
            ),
            Body::leaf("third", tiny_mesh(1)),
        ]
    }

    #[test]
    fn test_flatten_depth_first() {
        let bodies = system();
        let names: Vec<&str> = flatten(&bodies).iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["primary", "secondary", "third"]);
        assert_eq!(bodies[0].element_count(), 5);
        assert_eq!(bodies[0].leaves().len(), 2);
    }

    #[test]
    fn test_flatten_mut_matches_flatten() {
        let mut bodies = system();
        let sizes: Vec<usize> = flatten(&bodies).iter().map(|l| l.mesh.len()).collect();
        let leaves = flatten_mut(&mut bodies);
        let sizes_mut: Vec<usize> = leaves.iter().map(|l| l.mesh.len()).collect();
        assert_eq!(sizes, sizes_mut);
        assert_eq!(leaves[1].name, "secondary");
    }

    #[test]
    fn test_find_and_accessors() {
        let bodies = system();
        let inner = bodies[0].find("inner").unwrap();
        assert!(inner.is_composite());
        assert!(inner.mesh().is_none());
        let secondary = bodies[0].find("secondary").unwrap();
        assert_eq!(secondary.mesh().unwrap().len(), 2);
        assert!(secondary.children().is_empty());
        assert!(bodies[0].find("missing").is_none());
    }
}
