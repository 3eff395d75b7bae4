mod util;
use util::*;
use contour_sieve::algs::compress::{compress_step, compress_to_fixed_point};
use contour_sieve::prelude::*;
use proptest::prelude::*;

fn grid_and_levels() -> impl Strategy<Value = (usize, usize, Vec<i32>)> {
    (1usize..7, 1usize..7).prop_flat_map(|(rows, cols)| {
        (Just(rows), Just(cols), prop::collection::vec(0i32..5, rows * cols))
    })
}

fn grid_and_distinct() -> impl Strategy<Value = (usize, usize, u64)> {
    (1usize..7, 1usize..7, any::<u64>())
}

/// A forest where every slot points at a lower slot, the sentinel, or itself as terminal.
fn forest() -> impl Strategy<Value = Vec<MaskedIndex>> {
    prop::collection::vec((any::<u8>(), 0u8..4), 1..64).prop_map(|picks| {
        picks
            .iter()
            .enumerate()
            .map(|(slot, &(target, kind))| match (slot, kind) {
                (0, _) | (_, 0) => MaskedIndex::terminal(slot),
                (_, 1) => MaskedIndex::NONE,
                _ => MaskedIndex::new(target as usize % slot),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn sort_order_is_a_strict_total_order(values in prop::collection::vec(-3i32..3, 0..80)) {
        let order = SortOrder::compute(&values, &SerialExecutor);
        let all: Vec<usize> = (0..values.len()).collect();
        assert_permutation(order.order(), &all);
        for w in order.order().windows(2) {
            prop_assert!((values[w[0]], w[0]) < (values[w[1]], w[1]));
        }
        for v in 0..values.len() {
            prop_assert_eq!(order.vertex(order.rank(v)), v);
        }
    }

    #[test]
    fn merge_tree_arcs_respect_direction((rows, cols, values) in grid_and_levels()) {
        let grid = FreudenthalGrid2D::new(rows, cols).unwrap();
        let out = build_checked(&values, &grid);
        let join = out.join_tree.unwrap();
        let split = out.split_tree.unwrap();
        for r in 0..values.len() {
            if let Some(p) = join.parent(r).get() {
                prop_assert!(p > r);
            }
            if let Some(p) = split.parent(r).get() {
                prop_assert!(p < r);
            }
        }
    }

    #[test]
    fn contour_tree_is_a_tree_on_the_critical_points((rows, cols, values) in grid_and_levels()) {
        let grid = FreudenthalGrid2D::new(rows, cols).unwrap();
        let tree = build_checked(&values, &grid).tree;
        tree.validate_invariants().unwrap();
        prop_assert_eq!(tree.superarcs().len() + 1, tree.n_supernodes());

        let mut critical: Vec<usize> = tree
            .join_critical_points()
            .iter()
            .chain(tree.split_critical_points())
            .copied()
            .collect();
        critical.sort_unstable();
        critical.dedup();
        prop_assert_eq!(supernode_vertices(&tree), critical);
    }

    #[test]
    fn compression_is_idempotent(mut pointers in forest()) {
        compress_to_fixed_point(&mut pointers, &SerialExecutor, "prop").unwrap();
        let settled = pointers.clone();
        let all: Vec<usize> = (0..pointers.len()).collect();
        let moving = compress_step(&mut pointers, &all, &SerialExecutor, "prop").unwrap();
        prop_assert!(moving.is_empty());
        prop_assert_eq!(pointers.clone(), settled);
        // every chain is at most one hop long
        for p in &pointers {
            if !p.ends_chain() {
                prop_assert!(pointers[p.index()].ends_chain());
            }
        }
    }

    #[test]
    fn negated_field_has_the_same_tree((rows, cols, seed) in grid_and_distinct()) {
        let grid = FreudenthalGrid2D::new(rows, cols).unwrap();
        let values = random_distinct(rows * cols, seed);
        let negated: Vec<i64> = values.iter().map(|v| -v).collect();
        let up = build_checked(&values, &grid).tree;
        let down = build_checked(&negated, &grid).tree;
        prop_assert_eq!(supernode_vertices(&up), supernode_vertices(&down));
        prop_assert_eq!(superarc_vertex_pairs(&up), superarc_vertex_pairs(&down));

        let mut minima_up = up.join_critical_points().to_vec();
        let mut maxima_down = down.split_critical_points().to_vec();
        minima_up.sort_unstable();
        maxima_down.sort_unstable();
        prop_assert_eq!(minima_up, maxima_down);
    }
}
