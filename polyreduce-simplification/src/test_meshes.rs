//! Fixture meshes shared by the unit tests

use polyreduce_core::{Point3f, TriangleMesh};

pub(crate) fn tetrahedron() -> TriangleMesh {
    // Consistently wound: each shared edge appears in opposite directions
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.5, 1.0, 0.0),
            Point3f::new(0.5, 0.5, 1.0),
        ],
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )
}

/// Unit cube, 8 vertices and 12 outward-facing triangles
pub(crate) fn cube() -> TriangleMesh {
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, 0.0, 1.0),
            Point3f::new(1.0, 0.0, 1.0),
            Point3f::new(1.0, 1.0, 1.0),
            Point3f::new(0.0, 1.0, 1.0),
        ],
        vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ],
    )
    .with_name("Cube")
}

/// The unit cube plus a ninth vertex no triangle references
pub(crate) fn cube_with_isolated_vertex() -> TriangleMesh {
    let mut mesh = cube();
    mesh.vertices.push(Point3f::new(5.0, 5.0, 5.0));
    mesh
}

pub(crate) fn octahedron() -> TriangleMesh {
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(-1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, -1.0, 0.0),
            Point3f::new(0.0, 0.0, 1.0),
            Point3f::new(0.0, 0.0, -1.0),
        ],
        vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ],
    )
}

/// A single flat quad: two triangles, every vertex on the boundary
pub(crate) fn flat_quad() -> TriangleMesh {
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
}

/// A `size` x `size` grid whose heights follow a sine bump
pub(crate) fn curved_grid(size: usize) -> TriangleMesh {
    let mut vertices = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / (size - 1) as f32 * std::f32::consts::PI;
            let fy = y as f32 / (size - 1) as f32 * std::f32::consts::PI;
            vertices.push(Point3f::new(x as f32, y as f32, (fx.sin() * fy.sin()) * 2.0));
        }
    }
    let mut faces = Vec::new();
    for y in 0..(size - 1) {
        for x in 0..(size - 1) {
            let tl = y * size + x;
            let tr = tl + 1;
            let bl = (y + 1) * size + x;
            let br = bl + 1;
            faces.push([tl, bl, tr]);
            faces.push([tr, bl, br]);
        }
    }
    TriangleMesh::from_vertices_and_faces(vertices, faces)
}
