#![cfg_attr(docsrs, feature(doc_cfg))]
//! # contour-sieve
//!
//! contour-sieve computes the contour tree of a scalar field sampled on a
//! structured mesh: the graph whose nodes are the field's critical points and
//! whose arcs are the monotone regions between them. Construction follows the
//! parallel peak-pruning scheme: join and split trees are built by rounds of
//! data-parallel pruning, merged, and compressed into super- and hyper-arcs.
//!
//! ## Features
//! - Masked-index pointer arrays with flag bits and a "no such element" sentinel
//! - Neighbour oracles for 1-D lines and 2-D Freudenthal-triangulated grids
//! - Join/split trees by peak pruning with pointer-jumping compression
//! - Supernodes, superarcs, hypernodes, hyperarcs, and optional augmentation
//! - Serial and Rayon executors that produce identical trees
//!
//! ## Determinism
//!
//! Vertices are ordered by `(value, vertex id)`, so plateaus and duplicate
//! values are broken consistently. Every parallel step collects results in
//! input order and writes them afterwards, so the tree does not depend on the
//! number of worker threads.
//!
//! ## Usage
//!
//! ```
//! use contour_sieve::prelude::*;
//!
//! let mesh = FreudenthalGrid2D::new(2, 3).unwrap();
//! let field = [0.0f64, 3.0, 1.0, 2.0, 5.0, 4.0];
//! let maker = ContourTreeMaker::with_executor(ContourTreeConfig::default(), SerialExecutor);
//! let outcome = maker.build(&field, &mesh).unwrap();
//! assert!(outcome.warnings.is_empty());
//! assert!(outcome.tree.n_supernodes() >= 2);
//! ```

pub mod algs;
pub mod config;
pub mod contour_error;
pub mod contour_tree;
pub mod debug_invariants;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::contour_tree_maker::{ContourTreeMaker, ContourTreeOutcome};
    #[cfg(feature = "rayon")]
    pub use crate::algs::executor::RayonExecutor;
    pub use crate::algs::executor::{DefaultExecutor, Executor, SerialExecutor};
    pub use crate::algs::merge_tree::MergeTree;
    pub use crate::algs::ordering::{ScalarValue, SortOrder};
    pub use crate::config::ContourTreeConfig;
    pub use crate::contour_error::{ConstructionWarning, ContourTreeError, TreeKind};
    pub use crate::contour_tree::{ArcPosition, ContourTree, Supernode, TreeEdge};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::topology::freudenthal::FreudenthalGrid2D;
    pub use crate::topology::line::LineMesh;
    pub use crate::topology::masked_index::MaskedIndex;
    pub use crate::topology::mesh::{LinkComponents, MeshOracle};
}
