//! Merging the augmented join and split trees into contour-tree arcs.
//!
//! Classic leaf pruning: a vertex with no split children and one join child
//! is an *upper leaf* and its contour arc runs to its split parent; a vertex
//! with no join children and one split child is a *lower leaf* and its arc
//! runs to its join parent. Removing a leaf splices it out of the other tree,
//! which may expose new leaves. Children are tracked as counts plus the XOR of
//! their sort indices, so the single remaining child of a degree-one vertex is
//! read off without adjacency lists.

use crate::algs::merge_tree::MergeTree;
use crate::contour_error::{ContourTreeError, TreeKind};
use crate::topology::masked_index::MaskedIndex;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Upper,
    Lower,
}

/// Children of every vertex in one merge tree, as count and XOR.
struct Children {
    count: Vec<u32>,
    xor: Vec<usize>,
}

impl Children {
    fn of(parents: &[MaskedIndex]) -> Self {
        let n = parents.len();
        let mut count = vec![0u32; n];
        let mut xor = vec![0usize; n];
        for (v, p) in parents.iter().enumerate() {
            if let Some(p) = p.get() {
                count[p] += 1;
                xor[p] ^= v;
            }
        }
        Self { count, xor }
    }

    fn detach(&mut self, parent: usize, child: usize) {
        self.count[parent] -= 1;
        self.xor[parent] ^= child;
    }
}

/// Contour-tree arcs `(lower, upper)` in sort-index space, in the order they
/// were pruned. A field with `n` vertices yields `n - 1` arcs.
pub fn merge_trees(join: &MergeTree, split: &MergeTree) -> Result<Vec<(usize, usize)>, ContourTreeError> {
    if join.kind() != TreeKind::Join || split.kind() != TreeKind::Split {
        return Err(ContourTreeError::InvalidConfiguration(
            "contour merge needs a join tree and a split tree",
        ));
    }
    let n = join.len();
    if split.len() != n {
        return Err(ContourTreeError::InvariantViolation(format!(
            "join tree covers {n} vertices but split tree covers {}",
            split.len()
        )));
    }
    if n <= 1 {
        return Ok(Vec::new());
    }

    let mut join_parent = join.parents().to_vec();
    let mut split_parent = split.parents().to_vec();
    let mut below = Children::of(&join_parent);
    let mut above = Children::of(&split_parent);

    let leaf = |v: usize, below: &Children, above: &Children| match (above.count[v], below.count[v]) {
        (0, 1) => Some(Leaf::Upper),
        (1, 0) => Some(Leaf::Lower),
        _ => None,
    };

    let mut queue: VecDeque<usize> = (0..n).filter(|&v| leaf(v, &below, &above).is_some()).collect();
    let mut removed = vec![false; n];
    let mut arcs = Vec::with_capacity(n - 1);
    let disconnected = |arcs: &Vec<(usize, usize)>| ContourTreeError::DisconnectedTree {
        remaining: n - arcs.len(),
    };

    while let Some(v) = queue.pop_front() {
        if arcs.len() == n - 1 {
            break;
        }
        if removed[v] {
            continue;
        }
        let exposed = match leaf(v, &below, &above) {
            Some(Leaf::Upper) => {
                let child = below.xor[v];
                let lower = split_parent[v].get().ok_or_else(|| disconnected(&arcs))?;
                let up = join_parent[v];
                join_parent[child] = up;
                if let Some(p) = up.get() {
                    below.xor[p] ^= v ^ child;
                }
                above.detach(lower, v);
                arcs.push((lower, v));
                lower
            }
            Some(Leaf::Lower) => {
                let child = above.xor[v];
                let upper = join_parent[v].get().ok_or_else(|| disconnected(&arcs))?;
                let down = split_parent[v];
                split_parent[child] = down;
                if let Some(p) = down.get() {
                    above.xor[p] ^= v ^ child;
                }
                below.detach(upper, v);
                arcs.push((v, upper));
                upper
            }
            None => continue,
        };
        removed[v] = true;
        if leaf(exposed, &below, &above).is_some() {
            queue.push_back(exposed);
        }
    }

    if arcs.len() != n - 1 {
        return Err(disconnected(&arcs));
    }
    log::debug!("contour merge: {} arcs from {n} vertices", arcs.len());
    Ok(arcs)
}
