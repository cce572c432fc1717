//! One-shot edge collapse simplification
//!
//! Wraps the progressive [`Simplifier`](crate::Simplifier) for callers that
//! only want a single reduced copy of a mesh and have no use for scrubbing
//! between quality levels afterwards.

use crate::cost::CostModel;
use crate::reducible::ReducibleMesh;
use crate::MeshSimplifier;
use polyreduce_core::{Error, Result, TriangleMesh};

/// Edge collapse simplifier with seam preservation.
///
/// The reduction ratio is the share of non-seam vertices to remove; seam
/// vertices are never collapsed, so open borders and holes keep their
/// exact outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCollapseSimplifier {
    /// Policy used to rank collapses
    pub cost_model: CostModel,
}

impl EdgeCollapseSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost_model(cost_model: CostModel) -> Self {
        Self { cost_model }
    }
}

impl MeshSimplifier for EdgeCollapseSimplifier {
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh> {
        if mesh.is_empty() {
            return Err(Error::InvalidData("Mesh is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&reduction_ratio) {
            return Err(Error::InvalidData(
                "Reduction ratio must be between 0.0 and 1.0".to_string(),
            ));
        }

        let mut reducible = ReducibleMesh::new(mesh.clone(), self.cost_model)?;
        reducible.reduce(reduction_ratio * 100.0)
    }
}
