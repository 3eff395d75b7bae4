//! Construction options for [`ContourTreeMaker`](crate::algs::contour_tree_maker::ContourTreeMaker).

use serde::{Deserialize, Serialize};

/// Toggles for contour tree construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContourTreeConfig {
    /// Hang the contour tree from the global maximum instead of the global minimum.
    pub root_at_max: bool,
    /// Record a `(superarc, position)` for every vertex.
    pub augment: bool,
    /// Return the join and split trees alongside the contour tree.
    pub keep_merge_trees: bool,
    /// Upper bound on pruning rounds per merge tree; `None` runs to completion.
    pub max_rounds: Option<usize>,
    /// Run the full invariant checks on every result, not only in debug builds.
    pub validate: bool,
}

impl ContourTreeConfig {
    /// Augmented, validated, with both merge trees kept.
    pub fn all() -> Self {
        Self {
            augment: true,
            keep_merge_trees: true,
            validate: true,
            ..Self::default()
        }
    }

    pub fn with_root_at_max(mut self, yes: bool) -> Self {
        self.root_at_max = yes;
        self
    }

    pub fn with_augment(mut self, yes: bool) -> Self {
        self.augment = yes;
        self
    }

    pub fn with_merge_trees(mut self, yes: bool) -> Self {
        self.keep_merge_trees = yes;
        self
    }

    pub fn with_max_rounds(mut self, rounds: Option<usize>) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_validation(mut self, yes: bool) -> Self {
        self.validate = yes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_set_fields() {
        let cfg = ContourTreeConfig::default()
            .with_augment(true)
            .with_max_rounds(Some(8))
            .with_root_at_max(true);
        assert!(cfg.augment && cfg.root_at_max);
        assert_eq!(cfg.max_rounds, Some(8));
        assert!(!cfg.validate);
    }

    #[test]
    fn default_turns_everything_off() {
        let cfg = ContourTreeConfig::default();
        assert!(!cfg.root_at_max && !cfg.augment && !cfg.keep_merge_trees && !cfg.validate);
        assert_eq!(cfg.max_rounds, None);
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = ContourTreeConfig::all();
        let text = serde_json::to_string(&cfg).unwrap();
        let back: ContourTreeConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
