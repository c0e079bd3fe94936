//! Uniform 2D grid over projected triangles.
//!
//! Rays cast along the line of sight only meet triangles whose projected
//! bounding box contains the ray's footprint. Bucketing the boxes on the sky
//! plane turns the all-pairs occluder scan into a lookup of one cell.

use std::collections::HashMap;

use occulta_math::{Aabb2, Point2};

/// Cells per axis are capped so a few huge boxes cannot blow up the map.
const MAX_CELLS_PER_AXIS: usize = 1024;

/// Spatial hash of 2D boxes, keyed by grid cell.
///
/// Box ids are their indices in the slice passed to [`ProjectedGrid::build`];
/// each cell lists its ids in ascending order.
#[derive(Debug, Clone)]
pub struct ProjectedGrid {
    boxes: Vec<Aabb2>,
    origin: Point2,
    cell_size: f64,
    nx: usize,
    ny: usize,
    cells: HashMap<(usize, usize), Vec<usize>>,
}

impl ProjectedGrid {
    /// Bucket `boxes` into a grid whose cell size is the mean box extent.
    ///
    /// Empty or non-finite boxes are kept for id numbering but never
    /// returned by a query.
    pub fn build(boxes: &[Aabb2]) -> Self {
        let usable = |b: &Aabb2| {
            !b.is_empty()
                && b.min.x.is_finite()
                && b.min.y.is_finite()
                && b.max.x.is_finite()
                && b.max.y.is_finite()
        };

        let mut bounds = Aabb2::empty();
        let mut extent_sum = 0.0;
        let mut count = 0usize;
        for b in boxes.iter().filter(|b| usable(*b)) {
            bounds.include_point(&b.min);
            bounds.include_point(&b.max);
            let (w, h) = b.extent();
            extent_sum += w.max(h);
            count += 1;
        }

        if count == 0 {
            return Self {
                boxes: boxes.to_vec(),
                origin: Point2::origin(),
                cell_size: 1.0,
                nx: 0,
                ny: 0,
                cells: HashMap::new(),
            };
        }

        let (width, height) = bounds.extent();
        let mut cell_size = extent_sum / count as f64;
        cell_size = cell_size
            .max(width / MAX_CELLS_PER_AXIS as f64)
            .max(height / MAX_CELLS_PER_AXIS as f64);
        if cell_size <= 0.0 {
            // Every box collapsed to the same point
            cell_size = 1.0;
        }

        let nx = ((width / cell_size).floor() as usize + 1).min(MAX_CELLS_PER_AXIS);
        let ny = ((height / cell_size).floor() as usize + 1).min(MAX_CELLS_PER_AXIS);

        let mut grid = Self {
            boxes: boxes.to_vec(),
            origin: bounds.min,
            cell_size,
            nx,
            ny,
            cells: HashMap::new(),
        };

        for (id, b) in boxes.iter().enumerate() {
            if !usable(b) {
                continue;
            }
            let (x0, y0) = grid.cell_of(&b.min);
            let (x1, y1) = grid.cell_of(&b.max);
            for iy in y0..=y1 {
                for ix in x0..=x1 {
                    grid.cells.entry((ix, iy)).or_default().push(id);
                }
            }
        }

        grid
    }

    /// Number of boxes the grid was built from.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True if built from no boxes.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    // Clamped cell index; only meaningful for points inside the bounds.
    fn cell_of(&self, p: &Point2) -> (usize, usize) {
        let ix = ((p.x - self.origin.x) / self.cell_size).floor().max(0.0) as usize;
        let iy = ((p.y - self.origin.y) / self.cell_size).floor().max(0.0) as usize;
        (ix.min(self.nx - 1), iy.min(self.ny - 1))
    }

    fn cell(&self, p: &Point2) -> &[usize] {
        if self.nx == 0 {
            return &[];
        }
        let fx = (p.x - self.origin.x) / self.cell_size;
        let fy = (p.y - self.origin.y) / self.cell_size;
        // A point on the far boundary still belongs to the last cell
        if !(fx >= 0.0 && fy >= 0.0 && fx <= self.nx as f64 && fy <= self.ny as f64) {
            return &[];
        }
        let key = (
            (fx.floor() as usize).min(self.nx - 1),
            (fy.floor() as usize).min(self.ny - 1),
        );
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids of all boxes containing `p`, ascending.
    pub fn query<'a>(&'a self, p: &'a Point2) -> impl Iterator<Item = usize> + 'a {
        self.query_below(p, usize::MAX)
    }

    /// Ids `< limit` of boxes containing `p`, ascending.
    pub fn query_below<'a>(&'a self, p: &'a Point2, limit: usize) -> impl Iterator<Item = usize> + 'a {
        let ids = self.cell(p);
        let end = ids.partition_point(|&id| id < limit);
        ids[..end]
            .iter()
            .copied()
            .filter(move |&id| self.boxes[id].contains(p))
    }
}
