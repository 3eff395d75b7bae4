#![cfg(feature = "rayon")]

mod util;
use util::*;
use contour_sieve::prelude::*;

#[test]
fn serial_and_rayon_build_identical_trees() {
    let config = ContourTreeConfig::all();
    let grid = FreudenthalGrid2D::new(24, 31).unwrap();
    for seed in 0..4 {
        let values = random_levels(24 * 31, 9, seed);
        let serial_out = serial(config).build(&values, &grid).unwrap();
        for threads in [1, 3, 8] {
            let exec = RayonExecutor::with_threads(threads).unwrap();
            let par = ContourTreeMaker::with_executor(config, exec)
                .build(&values, &grid)
                .unwrap();
            assert_eq!(par.tree, serial_out.tree, "seed {seed}, {threads} threads");
            assert_eq!(par.join_tree, serial_out.join_tree);
            assert_eq!(par.split_tree, serial_out.split_tree);
        }
    }
}

#[test]
fn default_maker_uses_the_global_pool() {
    let (grid, values) = single_saddle_grid();
    let out = ContourTreeMaker::new(ContourTreeConfig::default())
        .build(&values, &grid)
        .unwrap();
    assert_eq!(out.tree.n_supernodes(), 4);
}
