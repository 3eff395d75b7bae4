//! Top-level contour tree construction.
//!
//! Sequence: order the field, build the join and split trees side by side,
//! merge them, then lay the super- and hyper-structure on top. Consistency
//! failures at any stage abort the build; a stalled pruning loop only adds a
//! warning to the outcome.

use crate::algs::contour::merge_trees;
use crate::algs::executor::{DefaultExecutor, Executor};
use crate::algs::hyper::HyperStructureBuilder;
use crate::algs::merge_tree::{MergeTree, MergeTreeBuilder};
use crate::algs::ordering::{ScalarValue, SortOrder};
use crate::config::ContourTreeConfig;
use crate::contour_error::{ConstructionWarning, ContourTreeError, TreeKind};
use crate::contour_tree::ContourTree;
use crate::debug_invariants::DebugInvariants;
use crate::topology::mesh::{MeshOracle, validate_adjacency};

/// A finished contour tree together with what else the build produced.
#[derive(Debug, Clone)]
pub struct ContourTreeOutcome {
    pub tree: ContourTree,
    /// Present when [`ContourTreeConfig::keep_merge_trees`] is set.
    pub join_tree: Option<MergeTree>,
    pub split_tree: Option<MergeTree>,
    pub warnings: Vec<ConstructionWarning>,
}

impl ContourTreeOutcome {
    fn empty() -> Self {
        Self {
            tree: ContourTree::empty(),
            join_tree: None,
            split_tree: None,
            warnings: Vec::new(),
        }
    }
}

/// Builds contour trees with a fixed configuration and executor.
#[derive(Debug, Clone)]
pub struct ContourTreeMaker<E = DefaultExecutor> {
    config: ContourTreeConfig,
    exec: E,
}

impl ContourTreeMaker<DefaultExecutor> {
    pub fn new(config: ContourTreeConfig) -> Self {
        Self {
            config,
            exec: DefaultExecutor::default(),
        }
    }
}

impl Default for ContourTreeMaker<DefaultExecutor> {
    fn default() -> Self {
        Self::new(ContourTreeConfig::default())
    }
}

impl<E: Executor> ContourTreeMaker<E> {
    pub fn with_executor(config: ContourTreeConfig, exec: E) -> Self {
        Self { config, exec }
    }

    pub fn config(&self) -> &ContourTreeConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.exec
    }

    /// Contour tree of `field` over `mesh`; `field[v]` is the value at vertex `v`.
    pub fn build<T, M>(&self, field: &[T], mesh: &M) -> Result<ContourTreeOutcome, ContourTreeError>
    where
        T: ScalarValue,
        M: MeshOracle + ?Sized,
    {
        let n = mesh.n_vertices();
        if field.len() != n {
            return Err(ContourTreeError::FieldSizeMismatch {
                expected: n,
                found: field.len(),
            });
        }
        if n == 0 {
            if self.config.augment {
                return Err(ContourTreeError::InvalidConfiguration(
                    "augmentation requested on an empty field",
                ));
            }
            log::info!("contour tree: empty field");
            return Ok(ContourTreeOutcome::empty());
        }
        validate_adjacency(mesh)?;

        let order = SortOrder::compute(field, &self.exec);
        let exec = &self.exec;
        let max_rounds = self.config.max_rounds;
        let merge_tree = |kind| {
            MergeTreeBuilder::new(mesh, &order, exec, kind)
                .with_max_rounds(max_rounds)
                .build()
        };
        let (join, split) = exec.join(|| merge_tree(TreeKind::Join), || merge_tree(TreeKind::Split));
        let (join, join_warning) = join?;
        let (split, split_warning) = split?;
        join.check_directionality()?;
        split.check_directionality()?;
        let warnings: Vec<ConstructionWarning> = join_warning.into_iter().chain(split_warning).collect();

        let arcs = merge_trees(&join, &split)?;
        let tree = HyperStructureBuilder::new(&order, exec)
            .root_at_max(self.config.root_at_max)
            .augment(self.config.augment)
            .build(&arcs, &join, &split)?;

        if self.config.validate || cfg!(feature = "strict-invariants") {
            join.validate_invariants()?;
            split.validate_invariants()?;
            tree.validate_invariants()?;
        } else {
            tree.debug_assert_invariants();
        }
        log::info!(
            "contour tree built: {n} vertices, {} supernodes, {} warnings",
            tree.n_supernodes(),
            warnings.len()
        );

        let (join_tree, split_tree) = if self.config.keep_merge_trees {
            (Some(join), Some(split))
        } else {
            (None, None)
        };
        Ok(ContourTreeOutcome {
            tree,
            join_tree,
            split_tree,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::executor::SerialExecutor;
    use crate::topology::line::LineMesh;

    fn maker(config: ContourTreeConfig) -> ContourTreeMaker<SerialExecutor> {
        ContourTreeMaker::with_executor(config, SerialExecutor)
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let err = maker(ContourTreeConfig::default())
            .build(&[1.0f64, 2.0], &LineMesh::new(3))
            .unwrap_err();
        assert_eq!(err, ContourTreeError::FieldSizeMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn empty_field_gives_empty_tree_unless_augmenting() {
        let empty: [f32; 0] = [];
        let out = maker(ContourTreeConfig::default())
            .build(&empty, &LineMesh::new(0))
            .unwrap();
        assert!(out.tree.is_empty());
        let err = maker(ContourTreeConfig::default().with_augment(true))
            .build(&empty, &LineMesh::new(0))
            .unwrap_err();
        assert!(matches!(err, ContourTreeError::InvalidConfiguration(_)));
    }

    #[test]
    fn constant_field_degrades_to_a_chain() {
        let out = maker(ContourTreeConfig::all())
            .build(&[3u8; 6], &LineMesh::new(6))
            .unwrap();
        assert_eq!(out.tree.n_supernodes(), 2);
        assert_eq!(out.tree.supernodes()[0].vertex, 0);
        assert_eq!(out.tree.supernodes()[1].vertex, 5);
        assert!(out.warnings.is_empty());
        assert_eq!(out.join_tree.map(|t| t.supernodes().len()), Some(2));
    }

    #[test]
    fn merge_trees_are_dropped_by_default() {
        let out = maker(ContourTreeConfig::default())
            .build(&[1, 3, 2], &LineMesh::new(3))
            .unwrap();
        assert!(out.join_tree.is_none() && out.split_tree.is_none());
        assert!(!out.tree.is_augmented());
    }
}
