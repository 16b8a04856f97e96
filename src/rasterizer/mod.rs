//! Software rasterizer
//!
//! Features:
//! - Row-major homogeneous matrices with a cofactor normal transform
//! - Scan-line triangle fill, flat or Gouraud (per-vertex color interpolation)
//! - Back-face culling and painter's-algorithm ordering (no depth buffer)
//! - Wireframe, normal glyphs, light marker and axes gizmo overlays

mod math;
mod types;
mod render;
mod backend;

pub use math::*;
pub use types::*;
pub use render::*;
pub use backend::*;

/// Default canvas dimensions
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;
