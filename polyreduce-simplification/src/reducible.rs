//! A source mesh paired with its simplifier
//!
//! [`ReducibleMesh`] is what a host holds per source mesh: it turns a
//! reduction percentage into a quality level and marshals the surviving
//! vertices and triangles back into a [`TriangleMesh`].

use crate::config::ReducerConfig;
use crate::cost::CostModel;
use crate::info::MeshInfo;
use crate::simplifier::Simplifier;
use itertools::Itertools;
use polyreduce_core::{Error, Point3f, Result, TriangleMesh, REDUCED_SUFFIX};
use tracing::warn;

/// Clamp a reduction percentage to [0, 100], warning when it was out of range.
pub fn clamp_reduction_percent(percent: f32) -> f32 {
    if percent.is_nan() {
        warn!("reduction percentage is NaN, using 0");
        return 0.0;
    }
    if !(0.0..=100.0).contains(&percent) {
        warn!(percent, "reduction percentage out of bounds, clamping to [0, 100]");
    }
    percent.clamp(0.0, 100.0)
}

#[derive(Debug)]
pub struct ReducibleMesh {
    source: TriangleMesh,
    simplifier: Simplifier,
    reduction_percent: f32,
}

impl ReducibleMesh {
    /// Build the graph for `source` at full detail.
    ///
    /// Meshes produced by an earlier reduction are refused: reducing them
    /// again would make the detail they lost unrecoverable.
    pub fn new(source: TriangleMesh, cost_model: CostModel) -> Result<Self> {
        if source.is_reduced() {
            warn!(mesh = %source.name, "skipping mesh that is already the output of a reduction");
            return Err(Error::invalid_data(format!(
                "mesh \"{}\" has already been reduced",
                source.name
            )));
        }

        let simplifier = Simplifier::from_triangle_mesh(&source, cost_model)?;

        Ok(Self {
            source,
            simplifier,
            reduction_percent: 0.0,
        })
    }

    /// Build the graph and move to the configured quality level.
    pub fn from_config(source: TriangleMesh, config: &ReducerConfig) -> Result<Self> {
        let mut mesh = Self::new(source, config.cost_model)?;
        mesh.set_reduction_percent(config.reduction_percent)?;
        Ok(mesh)
    }

    pub fn source(&self) -> &TriangleMesh {
        &self.source
    }

    pub fn simplifier(&self) -> &Simplifier {
        &self.simplifier
    }

    /// Reduction percentage currently applied, after clamping
    pub fn reduction_percent(&self) -> f32 {
        self.reduction_percent
    }

    /// Move to the quality level of `percent` (clamped to [0, 100]).
    pub fn set_reduction_percent(&mut self, percent: f32) -> Result<()> {
        let percent = clamp_reduction_percent(percent);
        self.simplifier.set_reduction_factor(percent / 100.0)?;
        self.reduction_percent = percent;
        Ok(())
    }

    /// Move to `percent` and return the resulting mesh.
    pub fn reduce(&mut self, percent: f32) -> Result<TriangleMesh> {
        self.set_reduction_percent(percent)?;
        self.reduced_mesh()
    }

    pub fn info(&self) -> MeshInfo {
        MeshInfo::new(self.source.name.clone(), &self.simplifier)
    }

    /// Original indices of the live vertices, ascending. Position `i` of the
    /// result is vertex `i` of [`reduced_mesh`](Self::reduced_mesh).
    pub fn live_vertex_indices(&self) -> Vec<usize> {
        self.simplifier.graph().live_vertices().collect_vec()
    }

    /// Select the entries of a per-vertex attribute stream (UVs, tangents,
    /// bone weights...) that belong to live vertices, in output order.
    ///
    /// The stream must hold exactly one entry per source vertex.
    pub fn remap_attribute<T: Clone>(&self, attribute: &[T]) -> Result<Vec<T>> {
        let graph = self.simplifier.graph();
        if attribute.len() != graph.vertex_count() {
            return Err(Error::invalid_data(format!(
                "attribute stream has {} entries, but the mesh has {} vertices",
                attribute.len(),
                graph.vertex_count()
            )));
        }

        Ok(graph.live_vertices().map(|v| attribute[v].clone()).collect())
    }

    /// Positions of the vertices that can never be collapsed
    pub fn seam_positions(&self) -> Vec<Point3f> {
        self.simplifier
            .seams()
            .iter()
            .map(|&v| self.simplifier.graph().position(v))
            .collect()
    }

    /// Marshal the current quality level into a standalone mesh.
    ///
    /// Live vertices are renumbered densely in their original order, live
    /// triangles keep their submesh, and the original normals and colors of
    /// the survivors are carried over unchanged.
    pub fn reduced_mesh(&self) -> Result<TriangleMesh> {
        let graph = self.simplifier.graph();

        let mut new_index = vec![None; graph.vertex_count()];
        for (i, v) in graph.live_vertices().enumerate() {
            new_index[v] = Some(i);
        }

        let mut faces = Vec::with_capacity(graph.live_triangle_count());
        let mut submeshes = Vec::with_capacity(self.source.submesh_count());

        for range in self.source.submesh_ranges() {
            let before = faces.len();

            for t in range.filter(|&t| !graph.is_triangle_deleted(t)) {
                let [a, b, c] = graph.triangle(t);
                match (new_index[a], new_index[b], new_index[c]) {
                    (Some(a), Some(b), Some(c)) => faces.push([a, b, c]),
                    _ => {
                        return Err(Error::invariant(format!(
                            "live triangle {t} references a deleted vertex"
                        )))
                    }
                }
            }

            submeshes.push(faces.len() - before);
        }

        let mut mesh = TriangleMesh::from_vertices_and_faces(
            self.remap_attribute(&self.source.vertices)?,
            faces,
        )
        .with_name(format!("{}{REDUCED_SUFFIX}", self.source.name));

        if !self.source.submeshes.is_empty() {
            mesh.submeshes = submeshes;
        }
        mesh.normals = self
            .source
            .normals
            .as_deref()
            .map(|n| self.remap_attribute(n))
            .transpose()?;
        mesh.colors = self
            .source
            .colors
            .as_deref()
            .map(|c| self.remap_attribute(c))
            .transpose()?;

        Ok(mesh)
    }
}
