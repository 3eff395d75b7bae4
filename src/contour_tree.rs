//! The finished contour tree.
//!
//! Supernodes are numbered densely in sort order. Every supernode except the
//! root owns exactly one outgoing superarc, so a superarc id is the id of its
//! source supernode. Hypernodes are numbered the same way over the hypernode
//! subset, and a hyperarc id is the id of its source hypernode.

use crate::algs::compress::chain_end;
use crate::contour_error::ContourTreeError;
use crate::debug_invariants::DebugInvariants;
use crate::topology::masked_index::MaskedIndex;
use serde::Serialize;

/// A critical point of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Supernode {
    pub vertex: usize,
    pub sort_index: usize,
}

/// A directed arc between two nodes of the same layer (super or hyper).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TreeEdge {
    pub from: usize,
    pub to: usize,
    /// `to` lies above `from` in the sort order.
    pub ascending: bool,
}

/// Where a vertex sits on the tree: a superarc and the fraction of that
/// superarc's sort-index span below the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcPosition {
    pub superarc: usize,
    /// 0 at the lower end of the superarc, 1 at the upper end.
    pub position: f64,
}

/// Immutable contour tree of a scalar field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourTree {
    pub(crate) n_vertices: usize,
    pub(crate) supernodes: Vec<Supernode>,
    /// Per supernode: target supernode id flagged ascending, sentinel at the root.
    pub(crate) superarcs: Vec<MaskedIndex>,
    /// Per vertex id: superarc the vertex lies on (for supernodes, their own).
    pub(crate) superparents: Vec<MaskedIndex>,
    /// Supernode ids of the hypernodes, ascending.
    pub(crate) hypernodes: Vec<usize>,
    /// Per hypernode: target hypernode id flagged ascending, sentinel at the root.
    pub(crate) hyperarcs: Vec<MaskedIndex>,
    /// Per supernode: hypernode id of the hyperarc its superarc belongs to.
    pub(crate) hyperparents: Vec<usize>,
    pub(crate) root: Option<usize>,
    /// Per vertex id, when augmented.
    pub(crate) arcs: Option<Vec<Option<ArcPosition>>>,
    /// Critical vertex ids of the join and split trees, in sort order.
    pub(crate) join_critical: Vec<usize>,
    pub(crate) split_critical: Vec<usize>,
}

impl ContourTree {
    /// Tree of an empty field.
    pub fn empty() -> Self {
        Self {
            n_vertices: 0,
            supernodes: Vec::new(),
            superarcs: Vec::new(),
            superparents: Vec::new(),
            hypernodes: Vec::new(),
            hyperarcs: Vec::new(),
            hyperparents: Vec::new(),
            root: None,
            arcs: None,
            join_critical: Vec::new(),
            split_critical: Vec::new(),
        }
    }

    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    pub fn is_empty(&self) -> bool {
        self.n_vertices == 0
    }

    pub fn supernodes(&self) -> &[Supernode] {
        &self.supernodes
    }

    pub fn n_supernodes(&self) -> usize {
        self.supernodes.len()
    }

    /// Supernode id of the root.
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn superarcs(&self) -> Vec<TreeEdge> {
        edges(&self.superarcs)
    }

    /// Number of superarcs incident on `supernode`.
    pub fn degree(&self, supernode: usize) -> usize {
        let incoming = self
            .superarcs
            .iter()
            .filter(|arc| arc.get() == Some(supernode))
            .count();
        incoming + usize::from(self.superarcs[supernode].is_some())
    }

    /// Supernode ids of the hypernodes, ascending.
    pub fn hypernodes(&self) -> &[usize] {
        &self.hypernodes
    }

    pub fn hyperarcs(&self) -> Vec<TreeEdge> {
        edges(&self.hyperarcs)
    }

    /// Per supernode: the hypernode whose hyperarc carries its superarc.
    pub fn hyperparents(&self) -> &[usize] {
        &self.hyperparents
    }

    /// Superarc `vertex` lies on. Supernodes report their own outgoing superarc;
    /// the root reports the sentinel.
    pub fn superparent(&self, vertex: usize) -> MaskedIndex {
        self.superparents[vertex]
    }

    pub fn is_augmented(&self) -> bool {
        self.arcs.is_some()
    }

    /// Superarc and position of `vertex`, when the tree was augmented.
    ///
    /// The root is reported on its lowest incoming superarc. A single-vertex
    /// field has no superarc to report.
    pub fn arc_of(&self, vertex: usize) -> Option<ArcPosition> {
        self.arcs.as_ref().and_then(|arcs| arcs[vertex])
    }

    /// Critical vertex ids of the join tree (minima and join saddles), in sort order.
    pub fn join_critical_points(&self) -> &[usize] {
        &self.join_critical
    }

    /// Critical vertex ids of the split tree (maxima and split saddles), in sort order.
    pub fn split_critical_points(&self) -> &[usize] {
        &self.split_critical
    }

    /// Supernode ids with no incoming superarc.
    pub fn leaves(&self) -> Vec<usize> {
        let mut has_child = vec![false; self.supernodes.len()];
        for arc in &self.superarcs {
            if let Some(t) = arc.get() {
                has_child[t] = true;
            }
        }
        (0..self.supernodes.len())
            .filter(|&s| !has_child[s] && Some(s) != self.root)
            .collect()
    }
}

fn edges(arcs: &[MaskedIndex]) -> Vec<TreeEdge> {
    arcs.iter()
        .enumerate()
        .filter_map(|(from, arc)| {
            arc.get().map(|to| TreeEdge {
                from,
                to,
                ascending: arc.is_ascending(),
            })
        })
        .collect()
}

impl DebugInvariants for ContourTree {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "ContourTree");
    }

    fn validate_invariants(&self) -> Result<(), ContourTreeError> {
        let violation = |msg: String| Err(ContourTreeError::InvariantViolation(msg));
        let n_super = self.supernodes.len();
        if self.n_vertices == 0 {
            return if n_super == 0 { Ok(()) } else { violation("empty tree has supernodes".into()) };
        }
        if self.superarcs.len() != n_super || self.hyperparents.len() != n_super {
            return violation(format!("{n_super} supernodes but mismatched per-supernode arrays"));
        }
        if !self.supernodes.windows(2).all(|w| w[0].sort_index < w[1].sort_index) {
            return violation("supernodes are not in sort order".into());
        }

        // exactly one root, every other supernode has one in-range superarc
        let roots: Vec<usize> = (0..n_super).filter(|&s| self.superarcs[s].is_none()).collect();
        if roots.len() != 1 || self.root != roots.first().copied() {
            return violation(format!("expected one root, found {roots:?}"));
        }
        for (s, arc) in self.superarcs.iter().enumerate() {
            let Some(t) = arc.get() else { continue };
            if t >= n_super || t == s {
                return violation(format!("superarc {s} -> {t} out of range"));
            }
            let ascending = self.supernodes[t].sort_index > self.supernodes[s].sort_index;
            if ascending != arc.is_ascending() {
                return violation(format!("superarc {s} -> {t} carries the wrong direction flag"));
            }
        }
        // sentinel closure: every supernode reaches the root
        for s in 0..n_super {
            if chain_end(&self.superarcs, s).is_err() {
                return violation(format!("superarc walk from {s} does not terminate"));
            }
        }

        for (h, &s) in self.hypernodes.iter().enumerate() {
            if self.hyperparents.get(s) != Some(&h) {
                return violation(format!("hypernode {h} is not its own hyperparent"));
            }
        }
        if self.hyperparents.iter().any(|&h| h >= self.hypernodes.len()) {
            return violation("hyperparent out of range".into());
        }

        if let Some(arcs) = &self.arcs {
            if arcs.len() != self.n_vertices {
                return violation(format!("augmentation covers {} of {} vertices", arcs.len(), self.n_vertices));
            }
            for (v, arc) in arcs.iter().enumerate() {
                match arc {
                    Some(a) if a.superarc >= n_super || !(0.0..=1.0).contains(&a.position) => {
                        return violation(format!("vertex {v} has an invalid arc position {a:?}"));
                    }
                    None if n_super > 1 => {
                        return violation(format!("vertex {v} is not on any superarc"));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_chain() -> ContourTree {
        ContourTree {
            n_vertices: 3,
            supernodes: vec![
                Supernode { vertex: 2, sort_index: 0 },
                Supernode { vertex: 0, sort_index: 2 },
            ],
            superarcs: vec![MaskedIndex::NONE, MaskedIndex::new(0)],
            superparents: vec![MaskedIndex::new(1), MaskedIndex::new(1), MaskedIndex::NONE],
            hypernodes: vec![0, 1],
            hyperarcs: vec![MaskedIndex::NONE, MaskedIndex::new(0)],
            hyperparents: vec![0, 1],
            root: Some(0),
            arcs: None,
            join_critical: vec![2, 0],
            split_critical: vec![2, 0],
        }
    }

    #[test]
    fn accessors_expose_edges() {
        let t = two_node_chain();
        t.validate_invariants().unwrap();
        assert_eq!(
            t.superarcs(),
            vec![TreeEdge {
                from: 1,
                to: 0,
                ascending: false
            }]
        );
        assert_eq!(t.degree(0), 1);
        assert_eq!(t.degree(1), 1);
        assert_eq!(t.leaves(), vec![1]);
        assert_eq!(t.arc_of(0), None);
    }

    #[test]
    fn wrong_direction_flag_is_reported() {
        let mut t = two_node_chain();
        t.superarcs[1] = MaskedIndex::new(0).with_flag(crate::topology::masked_index::IS_ASCENDING);
        assert!(matches!(
            t.validate_invariants(),
            Err(ContourTreeError::InvariantViolation(_))
        ));
    }

    #[test]
    fn second_root_is_reported() {
        let mut t = two_node_chain();
        t.superarcs[1] = MaskedIndex::NONE;
        assert!(t.validate_invariants().is_err());
    }

    #[test]
    fn empty_tree_is_valid() {
        let t = ContourTree::empty();
        assert!(t.is_empty());
        t.validate_invariants().unwrap();
    }
}
