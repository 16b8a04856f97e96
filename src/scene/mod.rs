//! Scene module - one lit, transformed polyhedron per session
//!
//! - View transform pipeline (scale, rotation, shift, viewport presets)
//! - Orbiting point light with distance attenuation
//! - Per-vertex Phong illumination
//! - RON scene files

mod light;
mod transform;
mod lighting;
mod scene;
mod config;

pub use light::*;
pub use transform::*;
pub use lighting::*;
pub use scene::*;
pub use config::*;
