//! Flattened, depth-sorted view over the meshes of several bodies.
//!
//! Detectors that compare elements across bodies work on one table: the
//! concatenation of every leaf mesh, each element tagged with its leaf.
//! The table is sorted front to back once per call; the sort is kept as a
//! permutation so results can be written back in each mesh's own order.

use std::ops::Range;

use crate::body::{flatten, flatten_mut, Body};
use crate::element::{Element, Visibility};
use crate::error::{EclipseError, Result};
use crate::mesh::VisibilityCounts;

/// Concatenated elements of a set of bodies, with a front-to-back order.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    elements: Vec<Element>,
    owners: Vec<usize>,
    ranges: Vec<Range<usize>>,
    names: Vec<String>,
    /// Front-to-back position -> element index.
    order: Vec<usize>,
    /// Element index -> front-to-back position.
    rank: Vec<usize>,
}

impl WorkingSet {
    /// Gather every leaf mesh of `bodies` into one depth-sorted table.
    ///
    /// Composites are traversed depth-first. Returns
    /// [`EclipseError::EmptyBodyList`] if `bodies` is empty.
    pub fn gather(bodies: &[Body]) -> Result<Self> {
        if bodies.is_empty() {
            return Err(EclipseError::EmptyBodyList);
        }

        let leaves = flatten(bodies);
        let total = leaves.iter().map(|l| l.mesh.len()).sum();

        let mut elements = Vec::with_capacity(total);
        let mut owners = Vec::with_capacity(total);
        let mut ranges = Vec::with_capacity(leaves.len());
        let mut names = Vec::with_capacity(leaves.len());

        for (leaf_index, leaf) in leaves.iter().enumerate() {
            let start = elements.len();
            elements.extend(leaf.mesh.iter().cloned());
            owners.resize(elements.len(), leaf_index);
            ranges.push(start..elements.len());
            names.push(leaf.name.to_string());
        }

        // Closest to the observer (smallest depth) first. Stable, so ties
        // keep mesh order.
        let mut order: Vec<usize> = (0..elements.len()).collect();
        order.sort_by(|&a, &b| elements[a].depth().total_cmp(&elements[b].depth()));

        let mut rank = vec![0; order.len()];
        for (position, &index) in order.iter().enumerate() {
            rank[index] = position;
        }

        Ok(Self {
            elements,
            owners,
            ranges,
            names,
            order,
            rank,
        })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if no leaf contributed any element.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in concatenation (body, then mesh) order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Element at concatenation index `index`.
    pub fn element(&self, index: usize) -> &Element {
        &self.elements[index]
    }

    /// Leaf body that owns element `index`.
    pub fn owner(&self, index: usize) -> usize {
        self.owners[index]
    }

    /// Number of leaf bodies.
    pub fn body_count(&self) -> usize {
        self.ranges.len()
    }

    /// Index range of leaf `body` in concatenation order.
    pub fn body_range(&self, body: usize) -> Range<usize> {
        self.ranges[body].clone()
    }

    /// Name of leaf `body`.
    pub fn body_name(&self, body: usize) -> &str {
        &self.names[body]
    }

    /// Element indices from front (closest to the observer) to back.
    pub fn front_to_back(&self) -> &[usize] {
        &self.order
    }

    /// Front-to-back position of element `index`.
    pub fn rank(&self, index: usize) -> usize {
        self.rank[index]
    }

    /// Element at front-to-back position `position`.
    pub fn sorted(&self, position: usize) -> &Element {
        &self.elements[self.order[position]]
    }

    /// Set the visibility of element `index`.
    pub fn set_visibility(&mut self, index: usize, visibility: Visibility) {
        self.elements[index].set_visibility(visibility);
    }

    /// Assign visibilities given in front-to-back order.
    pub fn assign_front_to_back(&mut self, visibilities: &[Visibility]) -> Result<()> {
        if visibilities.len() != self.order.len() {
            return Err(EclipseError::LengthMismatch {
                what: "sorted visibilities",
                expected: self.order.len(),
                found: visibilities.len(),
            });
        }
        for (&index, &v) in self.order.iter().zip(visibilities) {
            self.elements[index].set_visibility(v);
        }
        Ok(())
    }

    /// Count the elements in each visibility state.
    pub fn counts(&self) -> VisibilityCounts {
        VisibilityCounts::tally(&self.elements)
    }

    /// Write the visibility of every element back to the meshes of `bodies`.
    ///
    /// `bodies` must have the same leaf structure as when the set was
    /// gathered; anything else is a [`EclipseError::LengthMismatch`] and
    /// leaves the meshes untouched.
    pub fn scatter(&self, bodies: &mut [Body]) -> Result<()> {
        let mut leaves = flatten_mut(bodies);
        if leaves.len() != self.ranges.len() {
            return Err(EclipseError::LengthMismatch {
                what: "leaf bodies",
                expected: self.ranges.len(),
                found: leaves.len(),
            });
        }
        for (leaf, range) in leaves.iter().zip(&self.ranges) {
            if leaf.mesh.len() != range.len() {
                return Err(EclipseError::LengthMismatch {
                    what: "mesh elements",
                    expected: range.len(),
                    found: leaf.mesh.len(),
                });
            }
        }
        for (leaf, range) in leaves.iter_mut().zip(&self.ranges) {
            for (element, source) in leaf.mesh.iter_mut().zip(&self.elements[range.clone()]) {
                element.set_visibility(source.visibility());
            }
        }
        Ok(())
    }
}
