//! polyshade: software-rasterized polyhedron lighting
//!
//! A small fixed-function pipeline drawn entirely on the CPU:
//! - Cube, pyramid and parametric cone meshes
//! - Scale / rotation / shift / viewport transform chain with cofactor normals
//! - Per-vertex Phong lighting from an orbiting point light
//! - Back-face culling, painter's ordering, flat or Gouraud scan-line fill
//! - A 2D ellipse plotter on the same framebuffer

pub mod rasterizer;
pub mod mesh;
pub mod scene;
pub mod curve;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
