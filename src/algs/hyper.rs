//! Super- and hyper-structure of the contour tree.
//!
//! Input is the per-vertex contour arcs produced by [`merge_trees`]. Vertices
//! with exactly one arc up and one arc down are regular; everything else is a
//! supernode. The tree is rooted at the global minimum (or maximum), every
//! regular vertex gets a rootward and a leafward pointer, and both pointer
//! arrays are compressed so each vertex names the supernodes at the two ends of
//! its superarc. The same trick one level up, over supernodes whose in-degree
//! is one, yields the hyperarcs.
//!
//! [`merge_trees`]: crate::algs::contour::merge_trees

use crate::algs::compress::compress_to_fixed_point;
use crate::algs::executor::Executor;
use crate::algs::merge_tree::MergeTree;
use crate::algs::ordering::SortOrder;
use crate::contour_error::ContourTreeError;
use crate::contour_tree::{ArcPosition, ContourTree, Supernode};
use crate::topology::masked_index::{IS_ASCENDING, IS_HYPERNODE, IS_SUPERNODE, MaskedIndex};
use std::collections::VecDeque;

/// End of the compressed chain through `slot`.
#[inline]
fn resolve(pointers: &[MaskedIndex], slot: usize) -> usize {
    let p = pointers[slot];
    if p.ends_chain() { slot } else { p.index() }
}

/// `target` flagged ascending when it lies above `source` in sort order.
#[inline]
fn directed(target_id: usize, source_sort: usize, target_sort: usize) -> MaskedIndex {
    let arc = MaskedIndex::new(target_id);
    if target_sort > source_sort { arc.with_flag(IS_ASCENDING) } else { arc }
}

/// Vertex adjacency of the contour tree in compressed-row form.
struct Adjacency {
    offsets: Vec<usize>,
    neighbours: Vec<usize>,
}

impl Adjacency {
    fn new(n: usize, arcs: &[(usize, usize)]) -> Self {
        let mut offsets = vec![0usize; n + 1];
        for &(lo, hi) in arcs {
            offsets[lo + 1] += 1;
            offsets[hi + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }
        let mut fill = offsets.clone();
        let mut neighbours = vec![0usize; 2 * arcs.len()];
        for &(lo, hi) in arcs {
            neighbours[fill[lo]] = hi;
            fill[lo] += 1;
            neighbours[fill[hi]] = lo;
            fill[hi] += 1;
        }
        Self { offsets, neighbours }
    }

    #[inline]
    fn of(&self, v: usize) -> &[usize] {
        &self.neighbours[self.offsets[v]..self.offsets[v + 1]]
    }
}

/// Builds the [`ContourTree`] from contour arcs and the two merge trees.
pub struct HyperStructureBuilder<'a, E> {
    order: &'a SortOrder,
    exec: &'a E,
    root_at_max: bool,
    augment: bool,
}

impl<'a, E: Executor> HyperStructureBuilder<'a, E> {
    pub fn new(order: &'a SortOrder, exec: &'a E) -> Self {
        Self {
            order,
            exec,
            root_at_max: false,
            augment: false,
        }
    }

    /// Root the tree at the global maximum instead of the global minimum.
    pub fn root_at_max(mut self, yes: bool) -> Self {
        self.root_at_max = yes;
        self
    }

    /// Record a `(superarc, position)` for every vertex.
    pub fn augment(mut self, yes: bool) -> Self {
        self.augment = yes;
        self
    }

    pub fn build(
        self,
        arcs: &[(usize, usize)],
        join: &MergeTree,
        split: &MergeTree,
    ) -> Result<ContourTree, ContourTreeError> {
        let n = self.order.len();
        if n == 0 {
            return Ok(ContourTree::empty());
        }
        if arcs.len() + 1 != n {
            return Err(ContourTreeError::DisconnectedTree {
                remaining: n.saturating_sub(arcs.len()),
            });
        }
        let (order, exec) = (self.order, self.exec);

        let mut up = vec![0u32; n];
        let mut down = vec![0u32; n];
        for &(lo, hi) in arcs {
            if lo >= hi || hi >= n {
                return Err(ContourTreeError::InvariantViolation(format!(
                    "contour arc ({lo}, {hi}) is not ordered low to high"
                )));
            }
            up[lo] += 1;
            down[hi] += 1;
        }
        let is_regular = |r: usize| up[r] == 1 && down[r] == 1;

        // Supernodes in sort order, and the sort index -> supernode id table.
        let all: Vec<usize> = (0..n).collect();
        let supernode_sort = exec.compact(&all, |r| !is_regular(r));
        let mut supernode_id = vec![MaskedIndex::NONE; n];
        for (id, &r) in supernode_sort.iter().enumerate() {
            supernode_id[r] = MaskedIndex::new(id).with_flag(IS_SUPERNODE);
        }
        let n_super = supernode_sort.len();
        let root_sort = if self.root_at_max { n - 1 } else { 0 };
        let root = supernode_id[root_sort].index();

        let adjacency = Adjacency::new(n, arcs);
        let parent = rooted_parents(&adjacency, root_sort)?;

        let mut rootward = exec.map_indices(n, |r| {
            if is_regular(r) { parent[r] } else { MaskedIndex::terminal(r) }
        });
        compress_to_fixed_point(&mut rootward, exec, "rootward superarc chains")?;
        let mut leafward = exec.map_indices(n, |r| {
            if is_regular(r) {
                // the neighbour that is not the parent
                let nbrs = adjacency.of(r);
                MaskedIndex::new(nbrs[0] ^ nbrs[1] ^ parent[r].index())
            } else {
                MaskedIndex::terminal(r)
            }
        });
        compress_to_fixed_point(&mut leafward, exec, "leafward superarc chains")?;

        let superarcs = exec.map_indices(n_super, |id| {
            let s = supernode_sort[id];
            parent[s].get().map_or(MaskedIndex::NONE, |q| {
                let t = resolve(&rootward, q);
                directed(supernode_id[t].index(), s, t)
            })
        });
        let lowest_incoming = superarcs.iter().position(|arc| arc.get() == Some(root));

        let superparents = exec.map_indices(n, |v| {
            let r = order.rank(v);
            if is_regular(r) {
                MaskedIndex::new(supernode_id[resolve(&leafward, r)].index())
            } else if r == root_sort {
                MaskedIndex::NONE
            } else {
                MaskedIndex::new(supernode_id[r].index())
            }
        });

        let (hypernodes, hyperarcs, hyperparents) = self.hyperstructure(&supernode_sort, &superarcs, root)?;

        let positions = self.augment.then(|| {
            exec.map_indices(n, |v| -> Option<ArcPosition> {
                let r = order.rank(v);
                let arc = superparents[v].get().or(lowest_incoming)?;
                let source = supernode_sort[arc];
                let target = supernode_sort[superarcs[arc].index()];
                let (lo, hi) = (source.min(target), source.max(target));
                Some(ArcPosition {
                    superarc: arc,
                    position: (r - lo) as f64 / (hi - lo) as f64,
                })
            })
        });

        let supernodes = supernode_sort
            .iter()
            .map(|&r| Supernode {
                vertex: order.vertex(r),
                sort_index: r,
            })
            .collect();
        let critical = |tree: &MergeTree| -> Vec<usize> { tree.supernodes().iter().map(|&r| order.vertex(r)).collect() };

        log::info!(
            "contour tree: {n} vertices, {n_super} supernodes, {} hypernodes",
            hypernodes.len()
        );
        Ok(ContourTree {
            n_vertices: n,
            supernodes,
            superarcs,
            superparents,
            hypernodes,
            hyperarcs,
            hyperparents,
            root: Some(root),
            arcs: positions,
            join_critical: critical(join),
            split_critical: critical(split),
        })
    }

    /// Hypernodes (supernode ids), hyperarcs and per-supernode hyperparents.
    fn hyperstructure(
        &self,
        supernode_sort: &[usize],
        superarcs: &[MaskedIndex],
        root: usize,
    ) -> Result<(Vec<usize>, Vec<MaskedIndex>, Vec<usize>), ContourTreeError> {
        let exec = self.exec;
        let n_super = superarcs.len();
        let mut in_degree = vec![0u32; n_super];
        let mut in_xor = vec![0usize; n_super];
        for (s, arc) in superarcs.iter().enumerate() {
            if let Some(t) = arc.get() {
                in_degree[t] += 1;
                in_xor[t] ^= s;
            }
        }
        let is_hyper = |s: usize| s == root || in_degree[s] != 1;
        let ids: Vec<usize> = (0..n_super).collect();
        let hypernodes = exec.compact(&ids, |s| is_hyper(s));
        let mut hyper_id = vec![MaskedIndex::NONE; n_super];
        for (h, &s) in hypernodes.iter().enumerate() {
            hyper_id[s] = MaskedIndex::new(h).with_flag(IS_HYPERNODE);
        }

        // In-degree-one supernodes continue the hyperarc of their only child.
        let mut down = exec.map_indices(n_super, |s| {
            if is_hyper(s) { MaskedIndex::terminal(s) } else { MaskedIndex::new(in_xor[s]) }
        });
        compress_to_fixed_point(&mut down, exec, "hyperparents")?;
        let mut up = exec.map_indices(n_super, |s| {
            if is_hyper(s) { MaskedIndex::terminal(s) } else { MaskedIndex::new(superarcs[s].index()) }
        });
        compress_to_fixed_point(&mut up, exec, "hyperarc chains")?;

        let hyperparents = exec.map_indices(n_super, |s| hyper_id[resolve(&down, s)].index());
        let hyperarcs = exec.map_list(&hypernodes, |s| {
            superarcs[s].get().map_or(MaskedIndex::NONE, |t| {
                let end = resolve(&up, t);
                directed(hyper_id[end].index(), supernode_sort[s], supernode_sort[end])
            })
        });
        Ok((hypernodes, hyperarcs, hyperparents))
    }
}

/// Parent of every vertex when the tree is hung from `root`.
fn rooted_parents(adjacency: &Adjacency, root: usize) -> Result<Vec<MaskedIndex>, ContourTreeError> {
    let n = adjacency.offsets.len() - 1;
    let mut parent = vec![MaskedIndex::NONE; n];
    let mut seen = vec![false; n];
    let mut queue = VecDeque::from([root]);
    seen[root] = true;
    let mut visited = 1;
    while let Some(v) = queue.pop_front() {
        for &w in adjacency.of(v) {
            if !seen[w] {
                seen[w] = true;
                parent[w] = MaskedIndex::new(v);
                visited += 1;
                queue.push_back(w);
            }
        }
    }
    if visited != n {
        return Err(ContourTreeError::DisconnectedTree { remaining: n - visited });
    }
    Ok(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::contour::merge_trees;
    use crate::algs::executor::SerialExecutor;
    use crate::algs::merge_tree::MergeTreeBuilder;
    use crate::contour_error::TreeKind;
    use crate::contour_tree::TreeEdge;
    use crate::debug_invariants::DebugInvariants;
    use crate::topology::line::LineMesh;

    fn tree_of(values: &[i32], root_at_max: bool) -> ContourTree {
        let order = SortOrder::compute(values, &SerialExecutor);
        let mesh = LineMesh::new(values.len());
        let build = |kind| {
            MergeTreeBuilder::new(&mesh, &order, &SerialExecutor, kind)
                .build()
                .unwrap()
                .0
        };
        let (join, split) = (build(TreeKind::Join), build(TreeKind::Split));
        let arcs = merge_trees(&join, &split).unwrap();
        let tree = HyperStructureBuilder::new(&order, &SerialExecutor)
            .root_at_max(root_at_max)
            .augment(true)
            .build(&arcs, &join, &split)
            .unwrap();
        tree.validate_invariants().unwrap();
        tree
    }

    #[test]
    fn monotone_line_is_one_superarc() {
        let t = tree_of(&[1, 2, 3, 4, 5], false);
        assert_eq!(t.n_supernodes(), 2);
        assert_eq!(t.root(), Some(0));
        assert_eq!(
            t.superarcs(),
            vec![TreeEdge {
                from: 1,
                to: 0,
                ascending: false
            }]
        );
        assert_eq!(t.hypernodes(), &[0, 1]);
        let mid = t.arc_of(2).unwrap();
        assert_eq!(mid.superarc, 1);
        assert!((mid.position - 0.5).abs() < 1e-12);
        // the root sits at the low end of its only incoming superarc
        assert_eq!(t.arc_of(0).unwrap().position, 0.0);
    }

    #[test]
    fn zigzag_line_has_a_supernode_per_vertex() {
        // values 2 0 3 1 4: every vertex is critical
        let t = tree_of(&[2, 0, 3, 1, 4], false);
        assert_eq!(t.n_supernodes(), 5);
        assert_eq!(t.superarcs().len(), 4);
        // ranks 0 and 3 carry two arcs each on the path 2-0-3-1-4
        assert_eq!(t.degree(0), 2);
        assert_eq!(t.degree(3), 2);
        assert_eq!(t.join_critical_points(), &[1, 3, 2, 4]);
        assert_eq!(t.split_critical_points(), &[1, 3, 0, 2, 4]);
    }

    #[test]
    fn root_at_max_flips_every_arc() {
        let low = tree_of(&[1, 2, 3, 4, 5], false);
        let high = tree_of(&[1, 2, 3, 4, 5], true);
        assert_eq!(high.root(), Some(1));
        assert!(high.superarcs().iter().all(|e| e.ascending));
        assert!(low.superarcs().iter().all(|e| !e.ascending));
    }

    #[test]
    fn single_vertex_has_no_superarc() {
        let t = tree_of(&[9], false);
        assert_eq!(t.n_supernodes(), 1);
        assert!(t.superarcs().is_empty());
        assert_eq!(t.arc_of(0), None);
    }
}
