//! Read-only summary of a mesh's current reduction

use crate::simplifier::Simplifier;
use serde::Serialize;
use std::fmt;

/// Snapshot of vertex and triangle counts before and after reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeshInfo {
    pub name: String,
    pub original_vertex_count: usize,
    pub reduced_vertex_count: usize,
    pub original_triangle_count: usize,
    pub reduced_triangle_count: usize,
    pub seam_vertex_count: usize,
}

impl MeshInfo {
    pub fn new(name: impl Into<String>, simplifier: &Simplifier) -> Self {
        let graph = simplifier.graph();
        Self {
            name: name.into(),
            original_vertex_count: graph.vertex_count(),
            reduced_vertex_count: graph.live_vertex_count(),
            original_triangle_count: graph.triangle_count(),
            reduced_triangle_count: graph.live_triangle_count(),
            seam_vertex_count: simplifier.seams().len(),
        }
    }
}

impl fmt::Display for MeshInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} vertices, {}/{} triangles, {} seam vertices",
            self.name,
            self.reduced_vertex_count,
            self.original_vertex_count,
            self.reduced_triangle_count,
            self.original_triangle_count,
            self.seam_vertex_count
        )
    }
}
