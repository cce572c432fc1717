//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Marker appended to the name of every mesh produced by a reduction.
pub const REDUCED_SUFFIX: &str = " (reduced)";

/// A triangle mesh with vertices and faces
///
/// Faces of all submeshes are stored back to back in `faces`; `submeshes`
/// holds the face count of each submesh in order. An empty `submeshes`
/// means the whole mesh is a single submesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub name: String,
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub submeshes: Vec<usize>,
    pub normals: Option<Vec<Vector3f>>,
    pub colors: Option<Vec<[u8; 3]>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            name: String::new(),
            vertices: Vec::new(),
            faces: Vec::new(),
            submeshes: Vec::new(),
            normals: None,
            colors: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            ..Self::new()
        }
    }

    /// Create a mesh from a flat index buffer (stride 3), the layout most
    /// engines hand out.
    pub fn from_index_buffer(vertices: Vec<Point3f>, indices: &[u32]) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(Error::invalid_data(format!(
                "index buffer length {} is not a multiple of 3",
                indices.len()
            )));
        }

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
            .collect();

        Ok(Self::from_vertices_and_faces(vertices, faces))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Split the faces into submeshes of the given face counts
    pub fn with_submeshes(mut self, face_counts: Vec<usize>) -> Self {
        self.submeshes = face_counts;
        self
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of submeshes, never less than one
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len().max(1)
    }

    /// Face index ranges of each submesh
    pub fn submesh_ranges(&self) -> Vec<Range<usize>> {
        if self.submeshes.is_empty() {
            return vec![0..self.faces.len()];
        }

        let mut start = 0;
        self.submeshes
            .iter()
            .map(|&count| {
                let range = start..start + count;
                start += count;
                range
            })
            .collect()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Whether this mesh is the output of a previous reduction
    pub fn is_reduced(&self) -> bool {
        self.name.contains(REDUCED_SUFFIX.trim_start())
    }

    /// Check that every face references existing vertices and that the
    /// submesh layout covers the face list exactly.
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();

        for (fi, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&v| v >= vertex_count) {
                return Err(Error::invalid_data(format!(
                    "face {fi} references vertex {bad}, but the mesh has {vertex_count} vertices"
                )));
            }
        }

        if !self.submeshes.is_empty() {
            let total: usize = self.submeshes.iter().sum();
            if total != self.faces.len() {
                return Err(Error::invalid_data(format!(
                    "submesh face counts sum to {total}, but the mesh has {} faces",
                    self.faces.len()
                )));
            }
        }

        if let Some(normals) = &self.normals {
            if normals.len() != vertex_count {
                return Err(Error::invalid_data("normal count does not match vertex count"));
            }
        }

        if let Some(colors) = &self.colors {
            if colors.len() != vertex_count {
                return Err(Error::invalid_data("color count does not match vertex count"));
            }
        }

        Ok(())
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Set vertex colors
    pub fn set_colors(&mut self, colors: Vec<[u8; 3]>) {
        if colors.len() == self.vertices.len() {
            self.colors = Some(colors);
        }
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
