#![allow(dead_code)]
use contour_sieve::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Serial maker, so failures reproduce without thread-count noise.
pub fn serial(config: ContourTreeConfig) -> ContourTreeMaker<SerialExecutor> {
    ContourTreeMaker::with_executor(config, SerialExecutor)
}

/// Build with every option on and assert a clean result.
pub fn build_checked<T: ScalarValue, M: MeshOracle>(field: &[T], mesh: &M) -> ContourTreeOutcome {
    let out = serial(ContourTreeConfig::all())
        .build(field, mesh)
        .expect("contour tree construction must succeed");
    assert!(out.warnings.is_empty(), "unexpected warnings: {:?}", out.warnings);
    out
}

/// 3 x 5 grid with two peaks (20, 19) separated by a saddle (15) and a
/// single pit (0) on the boundary ring.
///
/// ```text
///   11 10  9  8  7
///    0 20 15 19  6
///    1  2  3  4  5
/// ```
pub fn single_saddle_grid() -> (FreudenthalGrid2D, Vec<f64>) {
    let grid = FreudenthalGrid2D::new(3, 5).unwrap();
    let values = vec![
        11.0, 10.0, 9.0, 8.0, 7.0, //
        0.0, 20.0, 15.0, 19.0, 6.0, //
        1.0, 2.0, 3.0, 4.0, 5.0,
    ];
    (grid, values)
}

/// Values drawn from `0..levels`, so ties are frequent for small `levels`.
pub fn random_levels(n: usize, levels: i32, seed: u64) -> Vec<i32> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..levels)).collect()
}

/// A random permutation of `0..n`: every value distinct.
pub fn random_distinct(n: usize, seed: u64) -> Vec<i64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut values: Vec<i64> = (0..n as i64).collect();
    values.shuffle(&mut rng);
    values
}

/// Vertex ids of the supernodes, sorted.
pub fn supernode_vertices(tree: &ContourTree) -> Vec<usize> {
    let mut v: Vec<usize> = tree.supernodes().iter().map(|s| s.vertex).collect();
    v.sort_unstable();
    v
}

/// Superarcs as unordered vertex pairs, sorted.
pub fn superarc_vertex_pairs(tree: &ContourTree) -> Vec<(usize, usize)> {
    let nodes = tree.supernodes();
    let mut pairs: Vec<(usize, usize)> = tree
        .superarcs()
        .iter()
        .map(|e| {
            let (a, b) = (nodes[e.from].vertex, nodes[e.to].vertex);
            (a.min(b), a.max(b))
        })
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
