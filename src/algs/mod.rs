//! Re-export public algorithms.

pub mod compress;
pub mod contour;
pub mod contour_tree_maker;
pub mod executor;
pub mod hyper;
pub mod merge_tree;
pub mod ordering;

pub use compress::{compress_step, compress_to_fixed_point};
pub use contour_tree_maker::{ContourTreeMaker, ContourTreeOutcome};
pub use executor::{Executor, SerialExecutor};
pub use merge_tree::{MergeTree, MergeTreeBuilder};
pub use ordering::SortOrder;
