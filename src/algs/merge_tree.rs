//! Join and split trees by parallel peak pruning.
//!
//! Both trees are built by the same code, parameterised by [`TreeKind`]. A
//! tree's *leaves* are the extrema it is born from (minima for the join tree,
//! maxima for the split tree) and its *root* is the opposite global extremum.
//! Throughout this module "leafward" means towards the leaves: downwards for
//! the join tree, upwards for the split tree. All arrays are indexed by sort
//! index, never by vertex id.
//!
//! Construction runs in four phases:
//! 1. every vertex steps to its first leafward neighbour and the resulting
//!    chains are compressed until each vertex names the leaf extremum it
//!    climbs to;
//! 2. vertices whose link has two or more leafward components become saddle
//!    candidates, with one edge per component to the extremum it climbs to;
//! 3. pruning rounds: every leaf picks its governing saddle (the leafward-most
//!    candidate pointing at it), every saddle picked by all of its targets
//!    absorbs them and becomes a leaf itself;
//! 4. the remaining leaf attaches to the root and every regular vertex is
//!    placed on the superarc it lies on.
//!
//! When the rounds stall or hit the configured bound, the candidates still
//! standing are resolved one at a time, leafward-most first, against the
//! pruning pointers the completed rounds left behind. The tree is the same
//! either way; only the warning tells the two paths apart.

use crate::algs::compress::{chain_end, compress_slots, compress_to_fixed_point};
use crate::algs::executor::Executor;
use crate::algs::ordering::SortOrder;
use crate::contour_error::{ConstructionWarning, ContourTreeError, TreeKind};
use crate::debug_invariants::DebugInvariants;
use crate::topology::masked_index::MaskedIndex;
use crate::topology::mesh::MeshOracle;
use itertools::Itertools;
use std::cmp::Reverse;

impl TreeKind {
    /// Whether leaves lie above their arcs (split tree) or below (join tree).
    #[inline]
    pub fn leaves_above(self) -> bool {
        matches!(self, TreeKind::Split)
    }

    /// `a` lies strictly leafward of `b`.
    #[inline]
    pub fn leafward(self, a: usize, b: usize) -> bool {
        if self.leaves_above() { a > b } else { a < b }
    }

    /// Sort index of the root for a field with `n` vertices.
    #[inline]
    pub fn root(self, n: usize) -> usize {
        if self.leaves_above() { 0 } else { n - 1 }
    }
}

/// A saddle candidate and the leaves its link components lead to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Saddle {
    node: usize,
    targets: Vec<usize>,
}

/// One merge tree, augmented with every vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTree {
    kind: TreeKind,
    /// Critical sort indices, ascending.
    supernodes: Vec<usize>,
    /// Next supernode rootward, for supernodes; sentinel elsewhere and at the root.
    superarcs: Vec<MaskedIndex>,
    /// Supernode at the leafward end of the superarc each vertex lies on.
    superparents: Vec<usize>,
    /// Next vertex rootward; sentinel at the root.
    parents: Vec<MaskedIndex>,
    /// Leaf extremum every vertex climbs to.
    extrema: Vec<usize>,
    rounds: usize,
}

impl MergeTree {
    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Critical points of this tree as sort indices, ascending.
    pub fn supernodes(&self) -> &[usize] {
        &self.supernodes
    }

    pub fn is_supernode(&self, sort_index: usize) -> bool {
        self.supernodes.binary_search(&sort_index).is_ok()
    }

    /// Supernodes with no leafward neighbour: the extrema the tree is born from.
    pub fn leaves(&self) -> Vec<usize> {
        let mut has_child = vec![false; self.len()];
        for &s in &self.supernodes {
            if let Some(t) = self.superarcs[s].get() {
                has_child[t] = true;
            }
        }
        self.supernodes.iter().copied().filter(|&s| !has_child[s]).collect()
    }

    pub fn root(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.kind.root(self.len()))
    }

    /// Next supernode rootward of supernode `sort_index`.
    pub fn superarc(&self, sort_index: usize) -> MaskedIndex {
        self.superarcs[sort_index]
    }

    pub fn superparent(&self, sort_index: usize) -> usize {
        self.superparents[sort_index]
    }

    /// Augmented arc of `sort_index`: the next vertex rootward.
    pub fn parent(&self, sort_index: usize) -> MaskedIndex {
        self.parents[sort_index]
    }

    pub fn parents(&self) -> &[MaskedIndex] {
        &self.parents
    }

    /// Leaf extremum reached by the monotone chain from `sort_index`.
    pub fn extremum(&self, sort_index: usize) -> usize {
        self.extrema[sort_index]
    }

    /// Pruning rounds the build needed.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Every augmented arc must point strictly rootward.
    pub fn check_directionality(&self) -> Result<(), ContourTreeError> {
        for (from, arc) in self.parents.iter().enumerate() {
            if let Some(to) = arc.get() {
                if to >= self.len() || !self.kind.leafward(from, to) {
                    return Err(ContourTreeError::DirectionalityViolation {
                        tree: self.kind,
                        from,
                        to,
                    });
                }
            }
        }
        Ok(())
    }
}

impl DebugInvariants for MergeTree {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "MergeTree");
    }

    fn validate_invariants(&self) -> Result<(), ContourTreeError> {
        self.check_directionality()?;
        let n = self.len();
        if n == 0 {
            return Ok(());
        }
        let root = self.kind.root(n);
        let roots = self.parents.iter().filter(|p| p.is_none()).count();
        if roots != 1 || self.parents[root].is_some() {
            return Err(ContourTreeError::InvariantViolation(format!(
                "{} tree has {roots} roots, expected exactly sort index {root}",
                self.kind
            )));
        }
        for &s in &self.supernodes {
            if self.superparents[s] != s {
                return Err(ContourTreeError::InvariantViolation(format!(
                    "{} supernode {s} is not its own superparent",
                    self.kind
                )));
            }
            if s != root && self.superarcs[s].is_none() {
                return Err(ContourTreeError::InvariantViolation(format!(
                    "{} supernode {s} has no superarc",
                    self.kind
                )));
            }
        }
        Ok(())
    }
}

/// Builds one merge tree over a mesh and a precomputed sort order.
///
/// The builder owns the round-scoped buffers (extremal chains, pruning
/// pointers, superarcs), so a join and a split builder can run side by side.
pub struct MergeTreeBuilder<'a, M: ?Sized, E> {
    mesh: &'a M,
    order: &'a SortOrder,
    exec: &'a E,
    kind: TreeKind,
    max_rounds: Option<usize>,
    chains: Vec<MaskedIndex>,
    superarcs: Vec<MaskedIndex>,
    jumps: Vec<MaskedIndex>,
}

impl<'a, M, E> MergeTreeBuilder<'a, M, E>
where
    M: MeshOracle + ?Sized,
    E: Executor,
{
    pub fn new(mesh: &'a M, order: &'a SortOrder, exec: &'a E, kind: TreeKind) -> Self {
        let n = order.len();
        Self {
            mesh,
            order,
            exec,
            kind,
            max_rounds: None,
            chains: Vec::new(),
            superarcs: vec![MaskedIndex::NONE; n],
            jumps: vec![MaskedIndex::NONE; n],
        }
    }

    /// Stop pruning after `rounds` rounds and report non-convergence.
    pub fn with_max_rounds(mut self, rounds: Option<usize>) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Run all phases. The warning is set when pruning stalled.
    pub fn build(mut self) -> Result<(MergeTree, Option<ConstructionWarning>), ContourTreeError> {
        let n = self.order.len();
        if n == 0 {
            let tree = MergeTree {
                kind: self.kind,
                supernodes: Vec::new(),
                superarcs: Vec::new(),
                superparents: Vec::new(),
                parents: Vec::new(),
                extrema: Vec::new(),
                rounds: 0,
            };
            return Ok((tree, None));
        }

        let leaves = self.trace_extremal_chains()?;
        let saddles = self.find_saddles()?;
        log::debug!(
            "{} tree: {} leaf extrema, {} saddle candidates",
            self.kind,
            leaves.len(),
            saddles.len()
        );
        let (rounds, absorbed, warning) = self.prune(&leaves, saddles)?;
        let supernodes = self.attach_to_root(&leaves, &absorbed)?;
        let extrema: Vec<usize> = (0..n).map(|r| self.extremum(r)).collect();
        let superparents = self.superparents(&supernodes, &extrema)?;
        let parents = self.augmented_parents(&superparents);

        let tree = MergeTree {
            kind: self.kind,
            supernodes,
            superarcs: self.superarcs,
            superparents,
            parents,
            extrema,
            rounds,
        };
        tree.check_directionality()?;
        log::info!(
            "{} tree: {} supernodes after {} pruning rounds",
            tree.kind,
            tree.supernodes.len(),
            rounds
        );
        Ok((tree, warning))
    }

    /// Leaf extremum of `sort_index`, read from the compressed chains.
    #[inline]
    fn extremum(&self, sort_index: usize) -> usize {
        let link = self.chains[sort_index];
        if link.is_terminal() { sort_index } else { link.index() }
    }

    /// Phase 1: step leafward and compress. Returns the leaf extrema.
    fn trace_extremal_chains(&mut self) -> Result<Vec<usize>, ContourTreeError> {
        let n = self.order.len();
        let (mesh, order, kind) = (self.mesh, self.order, self.kind);
        let ascending = kind.leaves_above();
        let chains = self.exec.map_indices(n, |rank| {
            mesh.extremal_neighbour(order.vertex(rank), order.index(), ascending)
        });
        for (rank, link) in chains.iter().enumerate() {
            if link.is_terminal() {
                continue;
            }
            let to = link.index();
            if to >= n || !kind.leafward(to, rank) {
                return Err(ContourTreeError::DirectionalityViolation { tree: kind, from: rank, to });
            }
        }
        self.chains = chains;
        let steps = compress_to_fixed_point(&mut self.chains, self.exec, "extremal chains")?;
        log::debug!("{kind} tree: extremal chains settled after {steps} steps");
        let chains = &self.chains;
        let all: Vec<usize> = (0..n).collect();
        Ok(self.exec.compact(&all, |r| chains[r].is_terminal()))
    }

    /// Phase 2: vertices with two or more leafward link components whose
    /// components reach distinct extrema.
    fn find_saddles(&self) -> Result<Vec<Saddle>, ContourTreeError> {
        let (mesh, order) = (self.mesh, self.order);
        let ascending = self.kind.leaves_above();
        let candidates = self.exec.map_indices(order.len(), |rank| -> Result<Option<Saddle>, ContourTreeError> {
            let vertex = order.vertex(rank);
            let components = mesh.neighbour_components(vertex, order.index(), ascending);
            if components.degree < 2 {
                return Ok(None);
            }
            let mut targets = Vec::with_capacity(components.degree as usize);
            for edge in components.edges() {
                let nbr = mesh
                    .neighbour(vertex, edge)
                    .ok_or(ContourTreeError::MissingComponentNeighbour { vertex, edge })?;
                targets.push(self.extremum(order.rank(nbr)));
            }
            targets.sort_unstable();
            targets.dedup();
            Ok((targets.len() >= 2).then_some(Saddle { node: rank, targets }))
        });
        candidates
            .into_iter()
            .filter_map(Result::transpose)
            .collect()
    }

    /// Phase 3: pruning rounds. Returns the round count, the saddles that
    /// absorbed their targets, and a warning if the rounds stalled.
    fn prune(
        &mut self,
        leaves: &[usize],
        mut saddles: Vec<Saddle>,
    ) -> Result<(usize, Vec<usize>, Option<ConstructionWarning>), ContourTreeError> {
        let n = self.order.len();
        let kind = self.kind;
        let mut pruned: Vec<usize> = Vec::with_capacity(leaves.len());
        let mut absorbed: Vec<usize> = Vec::new();
        let mut rounds = 0;
        let mut warning = None;

        while !saddles.is_empty() {
            if self.max_rounds.is_some_and(|max| rounds >= max) {
                warning = Some(self.stalled(rounds, saddles.len()));
                self.finish_serially(saddles, &mut absorbed)?;
                break;
            }
            rounds += 1;

            // Re-express every target as the leaf that currently stands for it.
            let jumps = &self.jumps;
            let resolved = self.exec.map_indices(saddles.len(), |i| -> Result<Saddle, ContourTreeError> {
                let saddle = &saddles[i];
                let targets: Vec<usize> = saddle
                    .targets
                    .iter()
                    .map(|&t| jumps[t].get().unwrap_or(t))
                    .sorted_unstable()
                    .dedup()
                    .collect();
                if let Some(&to) = targets.iter().find(|&&t| !kind.leafward(t, saddle.node)) {
                    return Err(ContourTreeError::DirectionalityViolation {
                        tree: kind,
                        from: to,
                        to: saddle.node,
                    });
                }
                Ok(Saddle { node: saddle.node, targets })
            });
            saddles = resolved
                .into_iter()
                .filter(|s| s.as_ref().map_or(true, |s| s.targets.len() >= 2))
                .collect::<Result<_, _>>()?;
            if saddles.is_empty() {
                break;
            }

            // Governing saddle of every leaf: the leafward-most candidate pointing at it.
            let mut governor = vec![MaskedIndex::NONE; n];
            for saddle in &saddles {
                for &t in &saddle.targets {
                    let current = governor[t];
                    if current.is_none() || kind.leafward(saddle.node, current.index()) {
                        governor[t] = MaskedIndex::new(saddle.node);
                    }
                }
            }
            let ready = self.exec.map_indices(saddles.len(), |i| {
                let saddle = &saddles[i];
                saddle.targets.iter().all(|&t| governor[t].get() == Some(saddle.node))
            });
            if !ready.iter().any(|&r| r) {
                warning = Some(self.stalled(rounds, saddles.len()));
                self.finish_serially(saddles, &mut absorbed)?;
                break;
            }

            let mut remaining = Vec::with_capacity(saddles.len());
            for (saddle, is_ready) in saddles.into_iter().zip(ready) {
                if !is_ready {
                    remaining.push(saddle);
                    continue;
                }
                for &t in &saddle.targets {
                    self.superarcs[t] = MaskedIndex::new(saddle.node);
                    self.jumps[t] = MaskedIndex::new(saddle.node);
                    pruned.push(t);
                }
                absorbed.push(saddle.node);
            }
            saddles = remaining;
            compress_slots(&mut self.jumps, &pruned, self.exec, "pruning pointers")?;
            log::debug!(
                "{kind} tree round {rounds}: {} leaves pruned so far, {} saddles active",
                pruned.len(),
                saddles.len()
            );
        }
        Ok((rounds, absorbed, warning))
    }

    fn stalled(&self, rounds: usize, remaining_saddles: usize) -> ConstructionWarning {
        log::warn!(
            "{} tree: pruning stopped after {rounds} rounds, resolving {remaining_saddles} saddle candidates serially",
            self.kind
        );
        ConstructionWarning::NonConvergence {
            tree: self.kind,
            rounds,
            remaining_saddles,
        }
    }

    /// Resolve the candidates a stalled loop left behind, leafward-most first.
    ///
    /// Every candidate leafward of a saddle has been settled by the time that
    /// saddle is visited, so its targets follow the pruning pointers to the
    /// current top of each component, and a candidate whose components have
    /// already met is regular.
    fn finish_serially(&mut self, mut saddles: Vec<Saddle>, absorbed: &mut Vec<usize>) -> Result<(), ContourTreeError> {
        let n = self.order.len();
        let kind = self.kind;
        saddles.sort_unstable_by_key(|s| if kind.leaves_above() { n - 1 - s.node } else { s.node });
        for saddle in saddles {
            let mut targets = saddle
                .targets
                .iter()
                .map(|&t| chain_end(&self.jumps, t))
                .collect::<Result<Vec<usize>, _>>()?;
            targets.sort_unstable();
            targets.dedup();
            if let Some(&to) = targets.iter().find(|&&t| !kind.leafward(t, saddle.node)) {
                return Err(ContourTreeError::DirectionalityViolation {
                    tree: kind,
                    from: to,
                    to: saddle.node,
                });
            }
            if targets.len() < 2 {
                continue;
            }
            for &t in &targets {
                self.superarcs[t] = MaskedIndex::new(saddle.node);
                self.jumps[t] = MaskedIndex::new(saddle.node);
            }
            absorbed.push(saddle.node);
        }
        Ok(())
    }

    /// Phase 4a: the one leaf still standing hangs off the root. Returns the
    /// sorted supernode list.
    fn attach_to_root(&mut self, leaves: &[usize], absorbed: &[usize]) -> Result<Vec<usize>, ContourTreeError> {
        let root = self.kind.root(self.order.len());
        let standing: Vec<usize> = leaves
            .iter()
            .chain(absorbed)
            .copied()
            .filter(|&s| s != root && self.superarcs[s].is_none())
            .collect();
        let root_is_leaf = leaves.contains(&root) || absorbed.contains(&root);
        if standing.len() + usize::from(root_is_leaf) > 1 {
            return Err(ContourTreeError::DisconnectedTree {
                remaining: standing.len() + usize::from(root_is_leaf),
            });
        }
        for &s in &standing {
            self.superarcs[s] = MaskedIndex::new(root);
        }
        let mut supernodes: Vec<usize> = leaves.iter().chain(absorbed).copied().collect();
        supernodes.push(root);
        supernodes.sort_unstable();
        supernodes.dedup();
        Ok(supernodes)
    }

    /// Phase 4b: the superarc each vertex lies on, named by its leafward
    /// supernode. Walks rootward from the vertex's extremum until the next
    /// supernode lies rootward of the vertex.
    fn superparents(&self, supernodes: &[usize], extrema: &[usize]) -> Result<Vec<usize>, ContourTreeError> {
        let kind = self.kind;
        let superarcs = &self.superarcs;
        let walks = self.exec.map_indices(self.order.len(), |rank| -> Result<usize, ContourTreeError> {
            if supernodes.binary_search(&rank).is_ok() {
                return Ok(rank);
            }
            let mut node = extrema[rank];
            for _ in 0..supernodes.len() {
                match superarcs[node].get() {
                    Some(next) if kind.leafward(rank, next) => return Ok(node),
                    Some(next) => node = next,
                    None => break,
                }
            }
            Err(ContourTreeError::UnresolvedSuperparent { tree: kind, sort_index: rank })
        });
        walks.into_iter().collect()
    }

    /// Phase 4c: chain the vertices of each superarc leafward to rootward and
    /// hand the last one to the superarc's rootward end.
    fn augmented_parents(&self, superparents: &[usize]) -> Vec<MaskedIndex> {
        let n = self.order.len();
        let kind = self.kind;
        let mut by_arc: Vec<usize> = (0..n).collect();
        self.exec.sort_by_key(&mut by_arc, |&r| {
            let leafward_rank = if kind.leaves_above() { r } else { n - 1 - r };
            (superparents[r], Reverse(leafward_rank))
        });
        let mut parents = vec![MaskedIndex::NONE; n];
        for (k, &rank) in by_arc.iter().enumerate() {
            let arc = superparents[rank];
            parents[rank] = match by_arc.get(k + 1) {
                Some(&next) if superparents[next] == arc => MaskedIndex::new(next),
                _ => self.superarcs[arc],
            };
        }
        parents
    }
}
