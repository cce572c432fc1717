//! Progressive, reversible mesh decimation
//!
//! Vertices are removed one edge collapse at a time, cheapest first. Every
//! collapse is recorded, so a mesh can be moved back and forth between
//! quality levels by replaying the log instead of recomputing it:
//! - [`MeshGraph`]: indexed adjacency with tombstoned vertices and triangles
//! - [`seams`]: vertices that are never collapsed
//! - [`CostModel`]: edge collapse cost policies
//! - [`Simplifier`]: the collapse queue, step log and cursor
//! - [`ReducibleMesh`] and [`MeshRegistry`]: host-facing wrappers producing
//!   reduced [`TriangleMesh`]es

pub mod collapse_queue;
pub mod collapse_step;
pub mod config;
pub mod cost;
pub mod edge_collapse;
pub mod info;
pub mod mesh_graph;
pub mod reducible;
pub mod registry;
pub mod seams;
pub mod simplifier;

#[cfg(test)]
mod test_meshes;

pub use collapse_queue::*;
pub use collapse_step::*;
pub use config::*;
pub use cost::*;
pub use edge_collapse::*;
pub use info::*;
pub use mesh_graph::*;
pub use reducible::*;
pub use registry::*;
pub use seams::*;
pub use simplifier::*;

use polyreduce_core::{Result, TriangleMesh};

/// Simplify a mesh by reducing the number of faces/vertices
pub trait MeshSimplifier {
    /// Simplify mesh with target reduction ratio (0.0 = no reduction, 1.0 = maximum reduction)
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh>;
}
