//! Build the contour tree of a small synthetic terrain and print it.
//!
//! Run with `cargo run --example grid_contour_tree -- 12 16`.

use contour_sieve::prelude::*;

fn main() -> Result<(), ContourTreeError> {
    let mut args = std::env::args().skip(1).map(|a| a.parse::<usize>());
    let rows = args.next().and_then(Result::ok).unwrap_or(9);
    let cols = args.next().and_then(Result::ok).unwrap_or(11);

    let grid = FreudenthalGrid2D::new(rows, cols)?;
    // two Gaussian hills on a tilted plane
    let field: Vec<f64> = (0..rows * cols)
        .map(|v| {
            let (r, c) = (grid.vertex_row(v) as f64, grid.vertex_col(v) as f64);
            let hill = |r0: f64, c0: f64, h: f64| h * (-((r - r0).powi(2) + (c - c0).powi(2)) / 6.0).exp();
            hill(rows as f64 * 0.3, cols as f64 * 0.3, 3.0) + hill(rows as f64 * 0.7, cols as f64 * 0.7, 2.0) + 0.01 * c
        })
        .collect();

    let outcome = ContourTreeMaker::new(ContourTreeConfig::default().with_augment(true)).build(&field, &grid)?;
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }

    let tree = &outcome.tree;
    println!("{rows} x {cols} grid: {} supernodes, {} hypernodes", tree.n_supernodes(), tree.hypernodes().len());
    for (id, node) in tree.supernodes().iter().enumerate() {
        let (r, c) = (grid.vertex_row(node.vertex), grid.vertex_col(node.vertex));
        println!(
            "  supernode {id:>3}: vertex ({r}, {c}) value {:.3} degree {}",
            field[node.vertex],
            tree.degree(id)
        );
    }
    for edge in tree.superarcs() {
        let dir = if edge.ascending { "up" } else { "down" };
        println!("  superarc {} -> {} ({dir})", edge.from, edge.to);
    }
    Ok(())
}
