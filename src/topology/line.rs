//! One-dimensional structured mesh: vertices on a line, two incident edges each.

use crate::topology::mesh::{LinkComponents, MeshOracle};

/// `n` vertices, vertex `i` adjacent to `i - 1` and `i + 1`.
///
/// The link of a vertex is two disconnected points, so every qualifying
/// neighbour is its own component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMesh {
    n: usize,
}

impl LineMesh {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl MeshOracle for LineMesh {
    fn n_vertices(&self) -> usize {
        self.n
    }

    fn max_neighbours(&self) -> usize {
        2
    }

    #[inline]
    fn neighbour(&self, vertex: usize, edge: usize) -> Option<usize> {
        match edge {
            0 if vertex + 1 < self.n => Some(vertex + 1),
            1 if vertex > 0 => Some(vertex - 1),
            _ => None,
        }
    }

    fn neighbour_components(&self, vertex: usize, sort_index: &[usize], ascending: bool) -> LinkComponents {
        let mask = self.qualifying_edges(vertex, sort_index, ascending);
        LinkComponents {
            mask,
            degree: mask.count_ones(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::masked_index::MaskedIndex;

    #[test]
    fn ends_have_one_neighbour() {
        let m = LineMesh::new(3);
        assert_eq!(m.neighbour(0, 1), None);
        assert_eq!(m.neighbour(0, 0), Some(1));
        assert_eq!(m.neighbour(2, 0), None);
        assert_eq!(m.neighbour(2, 1), Some(1));
    }

    #[test]
    fn interior_minimum_has_two_ascending_components() {
        // values 3, 1, 2 -> sort index 2, 0, 1
        let m = LineMesh::new(3);
        let sort_index = [2, 0, 1];
        let c = m.neighbour_components(1, &sort_index, true);
        assert_eq!(c.degree, 2);
        assert_eq!(c.mask, 0b11);
        assert_eq!(m.neighbour_components(1, &sort_index, false).degree, 0);
    }

    #[test]
    fn extremal_neighbour_steps_or_terminates() {
        let m = LineMesh::new(3);
        let sort_index = [0, 1, 2];
        assert_eq!(m.extremal_neighbour(0, &sort_index, true), MaskedIndex::new(1));
        assert_eq!(m.extremal_neighbour(2, &sort_index, true), MaskedIndex::terminal(2));
        assert_eq!(m.extremal_neighbour(0, &sort_index, false), MaskedIndex::terminal(0));
    }
}
