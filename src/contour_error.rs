//! ContourTreeError: Unified error type for contour-sieve public APIs
//!
//! Construction never panics on bad input. Internal consistency violations
//! (cycles, arcs pointing the wrong way, inconsistent adjacency) are reported
//! through this type and abort the build; recoverable conditions are reported
//! as [`ConstructionWarning`]s next to the finished tree.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which of the two merge trees a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TreeKind {
    /// Sublevel-set tree: arcs point to higher sort indices, root at the maximum.
    Join,
    /// Superlevel-set tree: arcs point to lower sort indices, root at the minimum.
    Split,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKind::Join => f.write_str("join"),
            TreeKind::Split => f.write_str("split"),
        }
    }
}

/// Unified error type for contour tree construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContourTreeError {
    /// The field does not carry one value per mesh vertex.
    #[error("Field has {found} values but the mesh has {expected} vertices")]
    FieldSizeMismatch { expected: usize, found: usize },
    /// A structured mesh was requested with a zero extent.
    #[error("Invalid mesh dimensions: {0}")]
    InvalidDimensions(String),
    /// The oracle reports more edge slots than a link mask can address.
    #[error("Topology error: {max_neighbours} edge slots per vertex exceed the limit of 64")]
    TooManyEdgeSlots { max_neighbours: usize },
    /// The requested configuration cannot be honoured for this input.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    /// The neighbour oracle reported an index outside `[0, n)` or the vertex itself.
    #[error("Topology error: neighbour {neighbour} of vertex {vertex} (edge {edge}) is out of range")]
    NeighbourOutOfRange {
        vertex: usize,
        edge: usize,
        neighbour: usize,
    },
    /// A link component names an edge that has no neighbour.
    #[error("Topology error: vertex {vertex} reports a link component on missing edge {edge}")]
    MissingComponentNeighbour { vertex: usize, edge: usize },
    /// `u` lists `v` as a neighbour but `v` does not list `u`.
    #[error("Topology error: vertex {vertex} lists {neighbour} as a neighbour but not vice versa")]
    AsymmetricAdjacency { vertex: usize, neighbour: usize },
    /// Pointer jumping did not reach a fixed point: the pointers contain a cycle.
    #[error("Topology error: cycle through sort index {sort_index} detected while compressing {what}")]
    CompressionCycle { what: &'static str, sort_index: usize },
    /// A merge-tree arc points against the orientation of its tree.
    #[error("Topology error: {tree} arc {from} -> {to} violates arc direction")]
    DirectionalityViolation {
        tree: TreeKind,
        from: usize,
        to: usize,
    },
    /// A vertex could not be placed on any superarc of a merge tree.
    #[error("Topology error: vertex at sort index {sort_index} has no {tree} superarc")]
    UnresolvedSuperparent { tree: TreeKind, sort_index: usize },
    /// Leaf pruning of the merged trees stopped before consuming every vertex.
    #[error("Topology error: contour tree merge left {remaining} vertices unconnected")]
    DisconnectedTree { remaining: usize },
    /// A structural invariant of a finished tree does not hold.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

/// Recoverable conditions detected during construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConstructionWarning {
    /// A pruning round made no progress (or the round bound was hit) while
    /// saddle candidates were still active. The surviving candidates were
    /// resolved serially, leafward-most first.
    NonConvergence {
        tree: TreeKind,
        rounds: usize,
        remaining_saddles: usize,
    },
}

impl fmt::Display for ConstructionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionWarning::NonConvergence {
                tree,
                rounds,
                remaining_saddles,
            } => write!(
                f,
                "{tree} tree pruning stalled after {rounds} rounds with {remaining_saddles} saddles left"
            ),
        }
    }
}
