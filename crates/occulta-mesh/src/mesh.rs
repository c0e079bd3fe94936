//! Ordered element containers.

use serde::{Deserialize, Serialize};

use crate::element::{Element, Visibility};

/// Number of elements in each visibility state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityCounts {
    /// Elements that are completely blocked.
    pub hidden: usize,
    /// Elements that are unobstructed.
    pub visible: usize,
    /// Elements that are partially blocked.
    pub partial: usize,
}

impl VisibilityCounts {
    /// Tally the visibility of a sequence of elements.
    pub fn tally<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Self {
        let mut counts = Self::default();
        for e in elements {
            counts.add(e.visibility());
        }
        counts
    }

    /// Count one more element in state `v`.
    pub fn add(&mut self, v: Visibility) {
        match v {
            Visibility::Hidden => self.hidden += 1,
            Visibility::Visible => self.visible += 1,
            Visibility::Partial => self.partial += 1,
        }
    }

    /// Total number of elements counted.
    pub fn total(&self) -> usize {
        self.hidden + self.visible + self.partial
    }
}

/// The surface of one body: an ordered sequence of elements.
///
/// Element order is part of the contract: detectors never reorder a mesh,
/// so index `i` refers to the same element before and after a call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    elements: Vec<Element>,
}

impl Mesh {
    /// Create a mesh from elements.
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the mesh has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements, in order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Iterate mutably over the elements.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Element> {
        self.elements.iter_mut()
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Visibility of every element, in mesh order.
    pub fn visibilities(&self) -> Vec<Visibility> {
        self.elements.iter().map(Element::visibility).collect()
    }

    /// Count the elements in each visibility state.
    pub fn counts(&self) -> VisibilityCounts {
        VisibilityCounts::tally(&self.elements)
    }

    /// Smallest positive element area, or `None` if no element has one.
    /// Zero-area (degenerate) elements are skipped.
    pub fn min_size(&self) -> Option<f64> {
        self.elements
            .iter()
            .map(Element::size)
            .filter(|s| *s > 0.0 && s.is_finite())
            .min_by(f64::total_cmp)
    }

    /// Sum of the sky-projected area of the observer-facing elements in
    /// state `v`.
    pub fn projected_area(&self, v: Visibility) -> f64 {
        self.elements
            .iter()
            .filter(|e| e.visibility() == v && e.mu() > 0.0)
            .map(Element::projected_size)
            .sum()
    }

    /// Projected area of visible elements.
    pub fn visible_projected_area(&self) -> f64 {
        self.projected_area(Visibility::Visible)
    }

    /// Projected area of partially visible elements.
    pub fn partial_projected_area(&self) -> f64 {
        self.projected_area(Visibility::Partial)
    }

    /// Projected area of hidden, observer-facing elements.
    pub fn hidden_projected_area(&self) -> f64 {
        self.projected_area(Visibility::Hidden)
    }
}

impl FromIterator<Element> for Mesh {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
