//! Barnes-Hut quadtree for the many-body force.
//!
//! The quadtree recursively subdivides space and records the centre of mass
//! of each cell. Cells that are small relative to their distance from a node
//! act on it as a single point, which turns the O(n²) pairwise charge into
//! roughly O(n log n).

use crate::Point;

/// One cell of the flattened tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadCell {
    /// Centre of mass X
    pub center_x: f64,
    /// Centre of mass Y
    pub center_y: f64,
    /// Number of points in this cell
    pub mass: f64,
    /// Cell width (for the theta criterion)
    pub width: f64,
    /// Children in nw, ne, sw, se order; all `None` for leaves
    pub children: [Option<usize>; 4],
    /// Points stored in a leaf. Leaves at the depth limit may hold several.
    pub points: Vec<usize>,
}

impl QuadCell {
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// A Barnes-Hut quadtree for 2D spatial partitioning.
#[derive(Debug, Default)]
pub struct QuadTree {
    /// Flattened cells; the root is at index 0
    cells: Vec<QuadCell>,
}

impl QuadTree {
    /// Build a quadtree from point positions.
    ///
    /// # Arguments
    /// * `positions` - Slice of point positions
    /// * `max_depth` - Maximum tree depth; coincident points share a leaf there
    pub fn build(positions: &[Point], max_depth: usize) -> Self {
        if positions.is_empty() {
            return Self::default();
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for pos in positions {
            min_x = min_x.min(pos.x);
            min_y = min_y.min(pos.y);
            max_x = max_x.max(pos.x);
            max_y = max_y.max(pos.y);
        }

        // Pad so points on the border fall strictly inside
        let padding = ((max_x - min_x).max(max_y - min_y) * 0.1).max(1.0);
        min_x -= padding;
        min_y -= padding;
        max_x += padding;
        max_y += padding;

        // Make it square
        let width = (max_x - min_x).max(max_y - min_y);
        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;

        let origin = Point::new(center_x - width / 2.0, center_y - width / 2.0);

        let mut cells = Vec::with_capacity(positions.len() * 2);
        let mut builder = TreeBuilder {
            positions,
            cells: &mut cells,
            max_depth,
        };

        let indices: Vec<usize> = (0..positions.len()).collect();
        builder.build_cell(&indices, origin.x, origin.y, width, 0);

        Self { cells }
    }

    /// The flattened cells, root first.
    pub fn cells(&self) -> &[QuadCell] {
        &self.cells
    }

    /// The root cell, if any point was inserted.
    pub fn root(&self) -> Option<&QuadCell> {
        self.cells.first()
    }
}

struct TreeBuilder<'a> {
    positions: &'a [Point],
    cells: &'a mut Vec<QuadCell>,
    max_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    fn build_cell(
        &mut self,
        indices: &[usize],
        x: f64,
        y: f64,
        width: f64,
        depth: usize,
    ) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let cell_idx = self.cells.len();
        self.cells.push(QuadCell::default());

        let mut com_x = 0.0;
        let mut com_y = 0.0;
        let mass = indices.len() as f64;

        for &i in indices {
            com_x += self.positions[i].x;
            com_y += self.positions[i].y;
        }
        com_x /= mass;
        com_y /= mass;

        if indices.len() == 1 || depth >= self.max_depth {
            self.cells[cell_idx] = QuadCell {
                center_x: com_x,
                center_y: com_y,
                mass,
                width,
                children: [None; 4],
                points: indices.to_vec(),
            };
            return Some(cell_idx);
        }

        let half_width = width / 2.0;
        let mid_x = x + half_width;
        let mid_y = y + half_width;

        let mut nw_indices = Vec::new();
        let mut ne_indices = Vec::new();
        let mut sw_indices = Vec::new();
        let mut se_indices = Vec::new();

        for &i in indices {
            let pos = &self.positions[i];
            if pos.x < mid_x {
                if pos.y < mid_y {
                    sw_indices.push(i);
                } else {
                    nw_indices.push(i);
                }
            } else if pos.y < mid_y {
                se_indices.push(i);
            } else {
                ne_indices.push(i);
            }
        }

        let children = [
            self.build_cell(&nw_indices, x, mid_y, half_width, depth + 1),
            self.build_cell(&ne_indices, mid_x, mid_y, half_width, depth + 1),
            self.build_cell(&sw_indices, x, y, half_width, depth + 1),
            self.build_cell(&se_indices, mid_x, y, half_width, depth + 1),
        ];

        self.cells[cell_idx] = QuadCell {
            center_x: com_x,
            center_y: com_y,
            mass,
            width,
            children,
            points: Vec::new(),
        };

        Some(cell_idx)
    }
}
