//! 2D k-d tree for fixed-radius neighbour queries on the sky plane.

use occulta_math::{Aabb2, Point2};

/// Maximum number of points stored in a leaf.
const LEAF_SIZE: usize = 8;

/// A k-d tree node - either a leaf holding points or a split with two children.
#[derive(Debug, Clone)]
pub enum KdNode {
    /// Leaf node holding points.
    Leaf {
        /// Bounding box of the points.
        bounds: Aabb2,
        /// Point ids with their positions.
        points: Vec<(usize, Point2)>,
    },
    /// Internal node splitting its points at the median of one axis.
    Internal {
        /// Bounding box of all points below this node.
        bounds: Aabb2,
        /// Points below the median.
        left: Box<KdNode>,
        /// Points at or above the median.
        right: Box<KdNode>,
    },
}

impl KdNode {
    fn bounds(&self) -> &Aabb2 {
        match self {
            KdNode::Leaf { bounds, .. } | KdNode::Internal { bounds, .. } => bounds,
        }
    }
}

/// k-d tree over 2D points, each tagged with an id.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    root: Option<KdNode>,
    len: usize,
}

impl KdTree {
    /// Build a tree over `(id, point)` pairs. Non-finite points are dropped.
    pub fn build(points: impl IntoIterator<Item = (usize, Point2)>) -> Self {
        let mut data: Vec<(usize, Point2)> = points
            .into_iter()
            .filter(|(_, p)| p.x.is_finite() && p.y.is_finite())
            .collect();
        let len = data.len();
        let root = if data.is_empty() {
            None
        } else {
            Some(build_node(&mut data))
        };
        Self { root, len }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ids of all points within `radius` of `center` (inclusive), unordered.
    pub fn within_radius(&self, center: &Point2, radius: f64) -> Vec<usize> {
        let mut found = Vec::new();
        self.for_each_within(center, radius, |id| found.push(id));
        found
    }

    /// Call `f` with the id of every point within `radius` of `center`.
    pub fn for_each_within(&self, center: &Point2, radius: f64, mut f: impl FnMut(usize)) {
        if let Some(root) = &self.root {
            query_node(root, center, radius * radius, &mut f);
        }
    }
}

fn build_node(data: &mut [(usize, Point2)]) -> KdNode {
    let bounds = Aabb2::from_points(data.iter().map(|(_, p)| p));

    if data.len() <= LEAF_SIZE {
        return KdNode::Leaf {
            bounds,
            points: data.to_vec(),
        };
    }

    // Split the longer side at the median
    let (w, h) = bounds.extent();
    let mid = data.len() / 2;
    if w >= h {
        data.select_nth_unstable_by(mid, |a, b| a.1.x.total_cmp(&b.1.x));
    } else {
        data.select_nth_unstable_by(mid, |a, b| a.1.y.total_cmp(&b.1.y));
    }

    let (left, right) = data.split_at_mut(mid);
    KdNode::Internal {
        bounds,
        left: Box::new(build_node(left)),
        right: Box::new(build_node(right)),
    }
}

fn query_node(node: &KdNode, center: &Point2, radius_sq: f64, f: &mut impl FnMut(usize)) {
    if box_distance_sq(node.bounds(), center) > radius_sq {
        return;
    }
    match node {
        KdNode::Leaf { points, .. } => {
            for (id, p) in points {
                if (p - center).norm_squared() <= radius_sq {
                    f(*id);
                }
            }
        }
        KdNode::Internal { left, right, .. } => {
            query_node(left, center, radius_sq, f);
            query_node(right, center, radius_sq, f);
        }
    }
}

/// Squared distance from `p` to the nearest point of `b` (zero inside).
fn box_distance_sq(b: &Aabb2, p: &Point2) -> f64 {
    let dx = (b.min.x - p.x).max(0.0).max(p.x - b.max.x);
    let dy = (b.min.y - p.y).max(0.0).max(p.y - b.max.y);
    dx * dx + dy * dy
}
