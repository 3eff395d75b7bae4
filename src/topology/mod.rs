//! Mesh-side abstractions for contour tree construction.
//!
//! This module provides:
//! - [`MaskedIndex`], the flagged index type every pointer array uses
//! - the [`MeshOracle`] trait through which the builders see the mesh
//! - structured oracles for lines and Freudenthal-triangulated 2-D grids

pub mod freudenthal;
pub mod line;
pub mod masked_index;
pub mod mesh;

pub use freudenthal::FreudenthalGrid2D;
pub use line::LineMesh;
pub use masked_index::MaskedIndex;
pub use mesh::{LinkComponents, MeshOracle, validate_adjacency};
