//! Front-to-back ordering of whole bodies.

use occulta_mesh::Mesh;
use serde::{Deserialize, Serialize};

/// How a body's depth is estimated when bodies are ordered front to back.
///
/// Both policies give a single number per body; bodies that interpenetrate
/// in depth (one wrapped around another, or nearly touching) have no correct
/// order and either policy may pick the wrong front body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthPolicy {
    /// Depth of the first element of the mesh. Cheap, and adequate for
    /// well separated bodies, but the first element can sit anywhere on the
    /// surface.
    #[default]
    FirstElement,
    /// Mean depth of the centers of the elements facing the observer,
    /// falling back to all elements when none does.
    VisibleCentroid,
}

impl DepthPolicy {
    /// Depth of `mesh` under this policy, or `None` for an empty mesh.
    pub fn depth(self, mesh: &Mesh) -> Option<f64> {
        let first = mesh.get(0)?;
        match self {
            DepthPolicy::FirstElement => Some(first.depth()),
            DepthPolicy::VisibleCentroid => {
                let (sum, count) = mesh
                    .iter()
                    .filter(|e| e.mu() > 0.0)
                    .fold((0.0, 0usize), |(s, n), e| (s + e.depth(), n + 1));
                if count > 0 {
                    Some(sum / count as f64)
                } else {
                    let sum: f64 = mesh.iter().map(|e| e.depth()).sum();
                    Some(sum / mesh.len() as f64)
                }
            }
        }
    }
}

/// Indices of `bodies` from the closest to the observer to the furthest.
///
/// Bodies with an empty mesh have no depth; they are left out with a warning.
/// Ties keep input order.
pub fn front_to_back<'a>(
    bodies: impl IntoIterator<Item = (&'a str, &'a Mesh)>,
    policy: DepthPolicy,
) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = Vec::new();
    for (index, (name, mesh)) in bodies.into_iter().enumerate() {
        match policy.depth(mesh) {
            Some(depth) => ranked.push((index, depth)),
            None => log::warn!("body '{name}' has no elements; skipped in eclipse ordering"),
        }
    }
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.into_iter().map(|(index, _)| index).collect()
}
