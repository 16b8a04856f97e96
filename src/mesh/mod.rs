//! Polyhedron meshes and their generators

mod mesh;
mod generators;

pub use mesh::*;
pub use generators::*;
