//! Adjacency graph of a triangle mesh under progressive collapse
//!
//! `MeshGraph` keeps the source positions untouched and tracks, per vertex,
//! the triangles it belongs to and the vertices it shares a triangle with.
//! Collapses never remove entries from the vertex or triangle arrays; they
//! mark them deleted so that a recorded [`CollapseStep`](crate::CollapseStep)
//! can bring them back.

use polyreduce_core::{normalize_or_zero, Error, Point3f, Result, TriangleMesh, Vector3f};
use std::collections::{BTreeSet, HashSet};

/// Vertex adjacency and triangle state of a mesh being simplified.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGraph {
    positions: Vec<Point3f>,
    /// Vertex slots of every triangle. Slots are rewritten by collapses.
    triangles: Vec<[usize; 3]>,
    /// Cached face normal per triangle (zero for degenerate faces)
    triangle_normals: Vec<Vector3f>,
    neighbor_vertices: Vec<BTreeSet<usize>>,
    adjacent_triangles: Vec<BTreeSet<usize>>,
    deleted_vertices: HashSet<usize>,
    deleted_triangles: HashSet<usize>,
}

impl MeshGraph {
    /// Build the graph from raw positions and triangles.
    pub fn new(positions: Vec<Point3f>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        let vertex_count = positions.len();

        for (t, tri) in triangles.iter().enumerate() {
            if tri.iter().any(|&v| v >= vertex_count) {
                return Err(Error::invalid_data(format!(
                    "triangle {t} {tri:?} references a vertex outside 0..{vertex_count}"
                )));
            }
        }

        let mut neighbor_vertices = vec![BTreeSet::new(); vertex_count];
        let mut adjacent_triangles = vec![BTreeSet::new(); vertex_count];

        for (t, tri) in triangles.iter().enumerate() {
            for (j, &v) in tri.iter().enumerate() {
                for (k, &other) in tri.iter().enumerate() {
                    if j != k {
                        neighbor_vertices[v].insert(other);
                    }
                }
                adjacent_triangles[v].insert(t);
            }
        }

        let mut graph = Self {
            positions,
            triangle_normals: Vec::with_capacity(triangles.len()),
            triangles,
            neighbor_vertices,
            adjacent_triangles,
            deleted_vertices: HashSet::new(),
            deleted_triangles: HashSet::new(),
        };

        graph.triangle_normals = (0..graph.triangles.len())
            .map(|t| graph.compute_triangle_normal(t))
            .collect();

        Ok(graph)
    }

    pub fn from_triangle_mesh(mesh: &TriangleMesh) -> Result<Self> {
        mesh.validate()?;
        Self::new(mesh.vertices.clone(), mesh.faces.clone())
    }

    /// Total number of vertices, deleted ones included
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Total number of triangles, deleted ones included
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn live_vertex_count(&self) -> usize {
        self.positions.len() - self.deleted_vertices.len()
    }

    pub fn live_triangle_count(&self) -> usize {
        self.triangles.len() - self.deleted_triangles.len()
    }

    pub fn deleted_vertex_count(&self) -> usize {
        self.deleted_vertices.len()
    }

    pub fn position(&self, v: usize) -> Point3f {
        self.positions[v]
    }

    pub fn positions(&self) -> &[Point3f] {
        &self.positions
    }

    pub fn triangle(&self, t: usize) -> [usize; 3] {
        self.triangles[t]
    }

    /// Cached normal of triangle `t`
    pub fn triangle_normal(&self, t: usize) -> Vector3f {
        self.triangle_normals[t]
    }

    pub fn neighbor_vertices(&self, v: usize) -> &BTreeSet<usize> {
        &self.neighbor_vertices[v]
    }

    pub fn adjacent_triangles(&self, v: usize) -> &BTreeSet<usize> {
        &self.adjacent_triangles[v]
    }

    pub fn is_vertex_deleted(&self, v: usize) -> bool {
        self.deleted_vertices.contains(&v)
    }

    pub fn is_triangle_deleted(&self, t: usize) -> bool {
        self.deleted_triangles.contains(&t)
    }

    /// Indices of the vertices that have not been collapsed, ascending
    pub fn live_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.positions.len()).filter(move |v| !self.deleted_vertices.contains(v))
    }

    /// Indices of the triangles that have not been deleted, ascending
    pub fn live_triangles(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.triangles.len()).filter(move |t| !self.deleted_triangles.contains(t))
    }

    pub fn triangle_has_vertex(&self, t: usize, v: usize) -> bool {
        self.triangles[t].contains(&v)
    }

    /// Normal of triangle `t` from its current vertex slots. Degenerate
    /// triangles yield the zero vector.
    pub fn compute_triangle_normal(&self, t: usize) -> Vector3f {
        self.normal_of(self.triangles[t])
    }

    /// Normal triangle `t` would have if its `from` slot held `to` instead.
    pub fn triangle_normal_with_replacement(&self, t: usize, from: usize, to: usize) -> Vector3f {
        let mut tri = self.triangles[t];
        if let Some(slot) = tri.iter_mut().find(|slot| **slot == from) {
            *slot = to;
        }
        self.normal_of(tri)
    }

    fn normal_of(&self, [u, v, w]: [usize; 3]) -> Vector3f {
        let a = self.positions[v] - self.positions[u];
        let b = self.positions[w] - self.positions[u];
        normalize_or_zero(a.cross(&b))
    }

    /// Rewrite the first slot of `t` holding `from` to hold `to`.
    pub(crate) fn replace_vertex(&mut self, t: usize, from: usize, to: usize) {
        if let Some(slot) = self.triangles[t].iter_mut().find(|slot| **slot == from) {
            *slot = to;
        }
    }

    pub(crate) fn set_triangle_normal(&mut self, t: usize, normal: Vector3f) {
        self.triangle_normals[t] = normal;
    }

    pub(crate) fn set_vertex_deleted(&mut self, v: usize, deleted: bool) {
        if deleted {
            self.deleted_vertices.insert(v);
        } else {
            self.deleted_vertices.remove(&v);
        }
    }

    pub(crate) fn set_triangle_deleted(&mut self, t: usize, deleted: bool) {
        if deleted {
            self.deleted_triangles.insert(t);
        } else {
            self.deleted_triangles.remove(&t);
        }
    }

    pub(crate) fn add_adjacent_triangle(&mut self, v: usize, t: usize) {
        self.adjacent_triangles[v].insert(t);
    }

    pub(crate) fn remove_adjacent_triangle(&mut self, v: usize, t: usize) {
        self.adjacent_triangles[v].remove(&t);
    }

    /// Rebuild the neighbor set of `vertex` from its current adjacent
    /// triangles.
    ///
    /// Always a full rebuild: patching neighbor sets incrementally goes wrong
    /// once several collapses touch overlapping neighborhoods.
    pub fn recalculate_neighbor_vertices(&mut self, vertex: usize) {
        let neighbors: BTreeSet<usize> = self.adjacent_triangles[vertex]
            .iter()
            .flat_map(|&t| self.triangles[t])
            .filter(|&x| x != vertex)
            .collect();

        self.neighbor_vertices[vertex] = neighbors;
    }
}
