//! Core data structures for polyreduce
//!
//! This crate provides the mesh type exchanged with the host application,
//! the point/vector aliases used throughout, and the shared error type.

pub mod point;
pub mod mesh;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

// Type aliases for easier imports
pub type Point = Point3f;
pub type Mesh = TriangleMesh;
