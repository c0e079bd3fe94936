//! Monotone-chain convex hull with logarithmic containment queries.
//!
//! The hull is kept as two x-monotone chains sharing their end points: the
//! lower chain turns left, the upper chain turns right, both walked from the
//! leftmost to the rightmost point. A query point is bracketed on each chain
//! by binary search on x and tested against that single edge.

use occulta_math::{turn, Point2, Turn};

/// Convex hull split into lower and upper chains, both sorted by x.
#[derive(Debug, Clone, PartialEq)]
pub struct GrahamHull {
    lower: Vec<Point2>,
    upper: Vec<Point2>,
}

impl GrahamHull {
    /// Hull of `points`. Non-finite points are ignored.
    pub fn from_points(points: &[Point2]) -> Self {
        let mut sorted: Vec<Point2> = points
            .iter()
            .copied()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        sorted.dedup();

        let lower = chain(&sorted, Turn::Left);
        let upper = chain(&sorted, Turn::Right);
        Self { lower, upper }
    }

    /// Lower chain, left to right.
    pub fn lower(&self) -> &[Point2] {
        &self.lower
    }

    /// Upper chain, left to right.
    pub fn upper(&self) -> &[Point2] {
        &self.upper
    }

    /// True if built from no points.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Hull vertices counter-clockwise, starting at the leftmost point.
    pub fn vertices(&self) -> Vec<Point2> {
        let mut v = self.lower.clone();
        if self.upper.len() > 2 {
            v.extend(self.upper[1..self.upper.len() - 1].iter().rev());
        }
        v
    }

    /// Closed boundary edges, counter-clockwise.
    pub fn edges(&self) -> Vec<(Point2, Point2)> {
        let v = self.vertices();
        match v.len() {
            0 | 1 => Vec::new(),
            2 => vec![(v[0], v[1])],
            n => (0..n).map(|i| (v[i], v[(i + 1) % n])).collect(),
        }
    }

    /// Total length of the boundary edges.
    pub fn perimeter(&self) -> f64 {
        self.edges().iter().map(|(a, b)| (b - a).norm()).sum()
    }

    /// True if `p` lies strictly inside the hull.
    ///
    /// Points on the bracketing lower or upper edge, and points whose x is
    /// not above the hull's minimum x, are outside. A vertical edge at the
    /// maximum x is not bracketed, so points on it test inside.
    pub fn contains(&self, p: &Point2) -> bool {
        above_edge(&self.lower, p, Turn::Left) && above_edge(&self.upper, p, Turn::Right)
    }

    /// Points along the boundary, no further than `spacing` apart; every
    /// hull vertex is included.
    ///
    /// A non-positive spacing yields just the vertices.
    pub fn boundary_samples(&self, spacing: f64) -> Vec<Point2> {
        let edges = self.edges();
        if edges.is_empty() {
            return self.vertices();
        }
        let mut samples = Vec::new();
        for (a, b) in edges {
            samples.push(a);
            let len = (b - a).norm();
            if spacing > 0.0 && len > spacing {
                let steps = (len / spacing).ceil() as usize;
                for k in 1..steps {
                    samples.push(a + (b - a) * (k as f64 / steps as f64));
                }
            }
        }
        if self.lower.len() == 2 && self.upper.len() == 2 {
            // Segment hull: the single edge does not close back
            samples.push(self.lower[1]);
        }
        samples
    }
}

/// Monotone chain over lexicographically sorted points, keeping only
/// vertices where the chain turns `keep`.
fn chain(sorted: &[Point2], keep: Turn) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(sorted.len());
    for p in sorted {
        while out.len() >= 2 && turn(&out[out.len() - 2], &out[out.len() - 1], p) != keep {
            out.pop();
        }
        out.push(*p);
    }
    out
}

/// Bracket `p.x` on `chain` and test the side of the bracketing edge.
fn above_edge(chain: &[Point2], p: &Point2, side: Turn) -> bool {
    let i = chain.partition_point(|q| q.x < p.x);
    if i == 0 || i == chain.len() {
        return false;
    }
    turn(&chain[i - 1], &chain[i], p) == side
}
