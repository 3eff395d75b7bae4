//! Two-dimensional structured grid with the Freudenthal triangulation.
//!
//! Every quad is split along its (row, col) → (row + 1, col + 1) diagonal, so
//! each interior vertex has six neighbours. Incident edges are numbered
//! counter-clockwise around the vertex:
//!
//! ```text
//!   edge 0: (row    , col + 1)
//!   edge 1: (row + 1, col + 1)
//!   edge 2: (row + 1, col    )
//!   edge 3: (row    , col - 1)
//!   edge 4: (row - 1, col - 1)
//!   edge 5: (row - 1, col    )
//! ```
//!
//! Consecutive edges (cyclically) bound a triangle, so the link of an interior
//! vertex is a hexagon. Edges that leave the grid are suppressed by comparing a
//! per-vertex boundary configuration against [`EDGE_BOUNDARY_MASKS`].

use crate::contour_error::ContourTreeError;
use crate::topology::mesh::{LinkComponents, MeshOracle};

pub const N_INCIDENT_EDGES: usize = 6;

pub const LEFT_BIT: u8 = 1;
pub const RIGHT_BIT: u8 = 2;
pub const TOP_BIT: u8 = 4;
pub const BOTTOM_BIT: u8 = 8;

/// Boundary bits that disable each incident edge.
pub const EDGE_BOUNDARY_MASKS: [u8; N_INCIDENT_EDGES] = [
    RIGHT_BIT,
    RIGHT_BIT | BOTTOM_BIT,
    BOTTOM_BIT,
    LEFT_BIT,
    LEFT_BIT | TOP_BIT,
    TOP_BIT,
];

const FULL_LINK: u64 = (1 << N_INCIDENT_EDGES) - 1;

/// Row-major `rows x cols` grid, vertex id `row * cols + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreudenthalGrid2D {
    rows: usize,
    cols: usize,
}

impl FreudenthalGrid2D {
    pub fn new(rows: usize, cols: usize) -> Result<Self, ContourTreeError> {
        if rows == 0 || cols == 0 {
            return Err(ContourTreeError::InvalidDimensions(format!(
                "{rows} x {cols} grid has no vertices"
            )));
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn vertex_id(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn vertex_row(&self, vertex: usize) -> usize {
        vertex / self.cols
    }

    #[inline]
    pub fn vertex_col(&self, vertex: usize) -> usize {
        vertex % self.cols
    }

    /// Which sides of the grid the vertex touches.
    #[inline]
    pub fn boundary_config(&self, vertex: usize) -> u8 {
        let row = self.vertex_row(vertex);
        let col = self.vertex_col(vertex);
        let mut config = 0;
        if col == 0 {
            config |= LEFT_BIT;
        }
        if col == self.cols - 1 {
            config |= RIGHT_BIT;
        }
        if row == 0 {
            config |= TOP_BIT;
        }
        if row == self.rows - 1 {
            config |= BOTTOM_BIT;
        }
        config
    }
}

impl MeshOracle for FreudenthalGrid2D {
    fn n_vertices(&self) -> usize {
        self.rows * self.cols
    }

    fn max_neighbours(&self) -> usize {
        N_INCIDENT_EDGES
    }

    #[inline]
    fn neighbour(&self, vertex: usize, edge: usize) -> Option<usize> {
        if edge >= N_INCIDENT_EDGES || self.boundary_config(vertex) & EDGE_BOUNDARY_MASKS[edge] != 0 {
            return None;
        }
        let cols = self.cols;
        Some(match edge {
            0 => vertex + 1,
            1 => vertex + cols + 1,
            2 => vertex + cols,
            3 => vertex - 1,
            4 => vertex - cols - 1,
            _ => vertex - cols,
        })
    }

    fn neighbour_components(&self, vertex: usize, sort_index: &[usize], ascending: bool) -> LinkComponents {
        let mask = self.qualifying_edges(vertex, sort_index, ascending);
        // The whole hexagon qualifies: one cyclic component with no start.
        if mask == FULL_LINK {
            return LinkComponents { mask: 1, degree: 1 };
        }
        // A component starts wherever an edge qualifies and its predecessor
        // does not; suppressed edges never qualify, which opens the cycle.
        let previous = ((mask << 1) | (mask >> (N_INCIDENT_EDGES - 1))) & FULL_LINK;
        let starts = mask & !previous;
        LinkComponents {
            mask: starts,
            degree: starts.count_ones(),
        }
    }
}
