//! Neighbour oracle: the only view of the mesh the contour tree needs.
//!
//! An oracle answers three questions about a vertex: who its incident
//! neighbours are (with edges that cross the mesh boundary suppressed), which
//! neighbour a monotone chain should step to, and how many connected runs of
//! higher (or lower) neighbours its link contains. All comparisons go through
//! the global sort index so that equal field values never tie.

use crate::contour_error::ContourTreeError;
use crate::topology::masked_index::MaskedIndex;

/// Connected components of the qualifying part of a vertex link.
///
/// `mask` has one bit set per component, at the edge number of the first
/// neighbour of that component; `degree` is the number of components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkComponents {
    pub mask: u64,
    pub degree: u32,
}

impl LinkComponents {
    /// Edge numbers of the first neighbour of each component, in edge order.
    pub fn edges(self) -> impl Iterator<Item = usize> {
        (0..MAX_EDGE_SLOTS).filter(move |&e| self.mask & (1 << e) != 0)
    }
}

/// Read-only neighbour queries over a mesh with dense vertex ids `[0, n)`.
///
/// Implementors must be side-effect free: the builders call these methods
/// concurrently for disjoint vertices.
pub trait MeshOracle: Sync {
    /// Number of vertices.
    fn n_vertices(&self) -> usize;

    /// Number of incident edge slots per vertex, at most [`MAX_EDGE_SLOTS`].
    fn max_neighbours(&self) -> usize;

    /// Neighbour across incident edge `edge`, or `None` if that edge leaves the mesh.
    fn neighbour(&self, vertex: usize, edge: usize) -> Option<usize>;

    /// Sort index of the first neighbour strictly above (`ascending`) or below
    /// the vertex, or the vertex's own sort index flagged terminal when it is
    /// extremal in that direction.
    fn extremal_neighbour(&self, vertex: usize, sort_index: &[usize], ascending: bool) -> MaskedIndex {
        let own = sort_index[vertex];
        (0..self.max_neighbours())
            .filter_map(|edge| self.neighbour(vertex, edge))
            .map(|nbr| sort_index[nbr])
            .find(|&nbr| if ascending { nbr > own } else { nbr < own })
            .map_or_else(|| MaskedIndex::terminal(own), MaskedIndex::new)
    }

    /// Bit mask of the incident edges leading above (`ascending`) or below the vertex.
    fn qualifying_edges(&self, vertex: usize, sort_index: &[usize], ascending: bool) -> u64 {
        let own = sort_index[vertex];
        (0..self.max_neighbours()).fold(0u64, |mask, edge| match self.neighbour(vertex, edge) {
            Some(nbr) if (sort_index[nbr] > own) == ascending => mask | (1 << edge),
            _ => mask,
        })
    }

    /// Connected runs of qualifying neighbours in the vertex link.
    fn neighbour_components(&self, vertex: usize, sort_index: &[usize], ascending: bool) -> LinkComponents;
}

/// Widest link a [`LinkComponents`] mask can describe.
pub const MAX_EDGE_SLOTS: usize = u64::BITS as usize;

/// Check that the edge slots fit a link mask and that every reported
/// neighbour lies in `[0, n)`, differs from the vertex, and reports the
/// vertex back.
pub fn validate_adjacency<M: MeshOracle + ?Sized>(mesh: &M) -> Result<(), ContourTreeError> {
    let n = mesh.n_vertices();
    let slots = mesh.max_neighbours();
    if slots > MAX_EDGE_SLOTS {
        return Err(ContourTreeError::TooManyEdgeSlots { max_neighbours: slots });
    }
    for vertex in 0..n {
        for edge in 0..slots {
            let Some(neighbour) = mesh.neighbour(vertex, edge) else {
                continue;
            };
            if neighbour >= n || neighbour == vertex {
                return Err(ContourTreeError::NeighbourOutOfRange {
                    vertex,
                    edge,
                    neighbour,
                });
            }
            let symmetric = (0..slots).any(|back| mesh.neighbour(neighbour, back) == Some(vertex));
            if !symmetric {
                return Err(ContourTreeError::AsymmetricAdjacency { vertex, neighbour });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two vertices, vertex 0 claims vertex 7 as neighbour.
    struct Broken;

    impl MeshOracle for Broken {
        fn n_vertices(&self) -> usize {
            2
        }
        fn max_neighbours(&self) -> usize {
            1
        }
        fn neighbour(&self, vertex: usize, _edge: usize) -> Option<usize> {
            (vertex == 0).then_some(7)
        }
        fn neighbour_components(&self, _: usize, _: &[usize], _: bool) -> LinkComponents {
            LinkComponents::default()
        }
    }

    /// Vertex 0 sees vertex 1 but not the other way round.
    struct OneWay;

    impl MeshOracle for OneWay {
        fn n_vertices(&self) -> usize {
            2
        }
        fn max_neighbours(&self) -> usize {
            1
        }
        fn neighbour(&self, vertex: usize, _edge: usize) -> Option<usize> {
            (vertex == 0).then_some(1)
        }
        fn neighbour_components(&self, _: usize, _: &[usize], _: bool) -> LinkComponents {
            LinkComponents::default()
        }
    }

    #[test]
    fn out_of_range_neighbour_is_rejected() {
        assert_eq!(
            validate_adjacency(&Broken),
            Err(ContourTreeError::NeighbourOutOfRange {
                vertex: 0,
                edge: 0,
                neighbour: 7
            })
        );
    }

    #[test]
    fn one_way_adjacency_is_rejected() {
        assert_eq!(
            validate_adjacency(&OneWay),
            Err(ContourTreeError::AsymmetricAdjacency {
                vertex: 0,
                neighbour: 1
            })
        );
    }

    /// Sixty-five edge slots, one more than a link mask holds.
    struct Wide;

    impl MeshOracle for Wide {
        fn n_vertices(&self) -> usize {
            1
        }
        fn max_neighbours(&self) -> usize {
            65
        }
        fn neighbour(&self, _vertex: usize, _edge: usize) -> Option<usize> {
            None
        }
        fn neighbour_components(&self, _: usize, _: &[usize], _: bool) -> LinkComponents {
            LinkComponents::default()
        }
    }

    #[test]
    fn oversized_link_is_rejected() {
        assert_eq!(
            validate_adjacency(&Wide),
            Err(ContourTreeError::TooManyEdgeSlots { max_neighbours: 65 })
        );
    }

    #[test]
    fn component_edges_follow_mask_bits() {
        let c = LinkComponents { mask: 0b101001, degree: 3 };
        assert_eq!(c.edges().collect::<Vec<_>>(), vec![0, 3, 5]);
    }
}
