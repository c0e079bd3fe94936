//! Self-visibility from the sign of `mu`.

use crate::body::Body;
use crate::detector::EclipseDetector;
use crate::element::Visibility;
use crate::error::{EclipseError, Result};
use crate::mesh::{Mesh, VisibilityCounts};

/// Marks every element facing the observer (`mu > 0`) visible and every
/// other element hidden. Never produces partial elements.
///
/// This is the complete answer for a single convex body that cannot
/// eclipse itself. For concave bodies or multi-body scenes it is the seed
/// that the eclipse detectors refine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizonClassifier;

impl HorizonClassifier {
    /// Create a horizon classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify every leaf mesh of `bodies`, recursing through composites.
    ///
    /// Always returns `Ok(false)`: no element is ever partial.
    pub fn classify(&self, bodies: &mut [Body]) -> Result<bool> {
        if bodies.is_empty() {
            return Err(EclipseError::EmptyBodyList);
        }
        let mut counts = VisibilityCounts::default();
        for body in bodies.iter_mut() {
            classify_body(body, &mut counts);
        }
        log::debug!(
            "horizon ({} faces): {} hidden, {} visible, {} partial",
            counts.total(),
            counts.hidden,
            counts.visible,
            counts.partial
        );
        Ok(false)
    }
}

/// Apply the horizon rule to one mesh.
pub fn classify_mesh(mesh: &mut Mesh) {
    for element in mesh.iter_mut() {
        let v = if element.mu() > 0.0 {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        element.set_visibility(v);
    }
}

fn classify_body(body: &mut Body, counts: &mut VisibilityCounts) {
    match body {
        Body::Leaf { mesh, .. } => {
            classify_mesh(mesh);
            for e in mesh.iter() {
                counts.add(e.visibility());
            }
        }
        Body::Composite { children, .. } => {
            for child in children.iter_mut() {
                classify_body(child, counts);
            }
        }
    }
}

impl EclipseDetector for HorizonClassifier {
    fn name(&self) -> &'static str {
        "horizon"
    }

    fn detect(&self, bodies: &mut [Body]) -> Result<bool> {
        self.classify(bodies)
    }
}
