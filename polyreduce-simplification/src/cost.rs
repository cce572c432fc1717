//! Collapse cost policies
//!
//! A cost scores how desirable it is to collapse vertex `u` into its
//! neighbor `v`; the simplifier always takes the cheapest collapse first.
//! Costs are pure functions of the current graph.

use crate::mesh_graph::MeshGraph;
use serde::{Deserialize, Serialize};

/// Strategy used to rank edge collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CostModel {
    /// `edge_length * curvature`: short edges on flat regions go first, so
    /// silhouettes and creases survive the longest.
    #[default]
    PreserveDetail,
    /// `(1 / edge_length) * (1 - curvature)`: short, sharp features go
    /// first. Useful for smoothing out the stair steps of voxel-derived
    /// meshes.
    RemoveDetail,
}

impl CostModel {
    /// Cost of collapsing `u` into `v`.
    pub fn cost(&self, u: usize, v: usize, graph: &MeshGraph) -> f32 {
        let edge_length = nalgebra::distance(&graph.position(u), &graph.position(v));

        match self {
            CostModel::PreserveDetail => edge_length * curvature(u, v, graph),
            CostModel::RemoveDetail => {
                if edge_length <= 0.0 {
                    // 1/0 * 0 would be NaN, which has no place in the queue's order
                    return f32::INFINITY;
                }
                (1.0 / edge_length) * (1.0 - curvature(u, v, graph))
            }
        }
    }
}

/// Curvature term in [0, 1] of the edge from `u` to `v` (1 = sharpest).
///
/// Every triangle at `u` that does not contain `v` is matched with its most
/// coplanar triangle among those containing both `u` and `v`. The worst of
/// those matches is the curvature: the sharpest angle the collapse would
/// fold away.
pub fn curvature(u: usize, v: usize, graph: &MeshGraph) -> f32 {
    let u_triangles = graph.adjacent_triangles(u);

    let (uv_triangles, others): (Vec<usize>, Vec<usize>) = u_triangles
        .iter()
        .copied()
        .partition(|&t| graph.triangle_has_vertex(t, v));

    others
        .iter()
        .map(|&t| {
            let n1 = graph.triangle_normal(t);
            uv_triangles
                .iter()
                .map(|&t2| (1.0 - n1.dot(&graph.triangle_normal(t2))) / 2.0)
                .fold(1.0f32, f32::min)
        })
        .fold(0.0f32, f32::max)
}
