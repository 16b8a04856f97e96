//! Mesh generators: cube, pyramid, cone
//!
//! Every generator emits outward-facing winding (right-hand rule on each
//! polygon's first three vertices) with +y pointing down the screen, so the
//! "top" of a shape sits at negative y.

use std::f32::consts::TAU;
use log::info;
use rand::Rng;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::rasterizer::{Rgb, Vec3};
use super::mesh::{Material, Mesh};

/// Error type for mesh generation
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("{name} must be at least {min}, got {got}")]
    TooFewSegments { name: &'static str, min: usize, got: usize },
    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },
    #[error("cone ratio must not be negative, got {0}")]
    NegativeRatio(f32),
    #[error("invalid polygon: {reason}")]
    InvalidPolygon { reason: String },
}

/// Parametric cone / truncated cone / cylinder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeParams {
    /// Bottom semi-axis along x
    pub radius_x: f32,
    /// Bottom semi-axis along z
    pub radius_z: f32,
    pub height: f32,
    /// Top radius as a fraction of the bottom; 0 gives a pointed cone
    pub ratio: f32,
    /// Segments around the axis
    pub h_appr: usize,
    /// Segments along the axis
    pub v_appr: usize,
    /// Concentric rings per end cap
    pub r_appr: usize,
}

impl Default for ConeParams {
    fn default() -> Self {
        Self {
            radius_x: 100.0,
            radius_z: 100.0,
            height: 200.0,
            ratio: 0.5,
            h_appr: 16,
            v_appr: 4,
            r_appr: 3,
        }
    }
}

/// Which solid to build, with its dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Cube { half_edge: f32, triangulated: bool },
    Pyramid { half_base: f32, height: f32 },
    Cone(ConeParams),
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Cube { .. } => "cube",
            ShapeKind::Pyramid { .. } => "pyramid",
            ShapeKind::Cone(_) => "cone",
        }
    }

    pub fn default_cube() -> Self {
        ShapeKind::Cube { half_edge: 50.0, triangulated: false }
    }

    pub fn default_pyramid() -> Self {
        ShapeKind::Pyramid { half_base: 50.0, height: 150.0 }
    }
}

impl Default for ShapeKind {
    fn default() -> Self {
        ShapeKind::Cone(ConeParams::default())
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    Rgb::new(rng.gen(), rng.gen(), rng.gen())
}

fn require_positive(name: &'static str, value: f32) -> Result<(), MeshError> {
    // Also rejects NaN
    if value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::NonPositiveDimension { name, value })
    }
}

fn require_segments(name: &'static str, min: usize, got: usize) -> Result<(), MeshError> {
    if got >= min {
        Ok(())
    } else {
        Err(MeshError::TooFewSegments { name, min, got })
    }
}

/// Build the mesh for a shape
pub fn generate<R: Rng + ?Sized>(
    shape: &ShapeKind,
    material: Material,
    rng: &mut R,
) -> Result<Mesh, MeshError> {
    let mesh = match *shape {
        ShapeKind::Cube { half_edge, triangulated } => cube(half_edge, triangulated, material, rng)?,
        ShapeKind::Pyramid { half_base, height } => pyramid(half_base, height, material, rng)?,
        ShapeKind::Cone(params) => cone(&params, material, rng)?,
    };
    info!(
        "generated {}: {} vertices, {} polygons",
        shape.name(),
        mesh.vertex_count(),
        mesh.polygon_count()
    );
    Ok(mesh)
}

/// Add faces from a topology table, splitting quads into two triangles
/// when `triangulate` is set
fn add_faces<R: Rng + ?Sized>(
    mesh: &mut Mesh,
    faces: &[&[usize]],
    triangulate: bool,
    rng: &mut R,
) -> Result<(), MeshError> {
    for face in faces {
        if triangulate && face.len() == 4 {
            mesh.add_polygon(&[face[0], face[1], face[2]], random_color(rng))?;
            mesh.add_polygon(&[face[0], face[2], face[3]], random_color(rng))?;
        } else {
            mesh.add_polygon(face, random_color(rng))?;
        }
    }
    Ok(())
}

/// Axis-aligned cube with corners at (±L, ±L, ±L)
pub fn cube<R: Rng + ?Sized>(
    half_edge: f32,
    triangulated: bool,
    material: Material,
    rng: &mut R,
) -> Result<Mesh, MeshError> {
    require_positive("half_edge", half_edge)?;
    let l = half_edge;

    // Vertex index = 4*xi + 2*yi + zi
    let mut mesh = Mesh::new(material);
    for x in [-l, l] {
        for y in [-l, l] {
            for z in [-l, l] {
                mesh.add_vertex(Vec3::new(x, y, z));
            }
        }
    }

    let faces: [&[usize]; 6] = [
        &[0, 1, 3, 2], // -x
        &[0, 2, 6, 4], // -z
        &[0, 4, 5, 1], // -y
        &[1, 5, 7, 3], // +z
        &[2, 3, 7, 6], // +y
        &[4, 6, 7, 5], // +x
    ];
    add_faces(&mut mesh, &faces, triangulated, rng)?;
    mesh.compute_vertex_normals();
    Ok(mesh)
}

/// Square pyramid: base at y = +h/2, apex at y = -h/2
pub fn pyramid<R: Rng + ?Sized>(
    half_base: f32,
    height: f32,
    material: Material,
    rng: &mut R,
) -> Result<Mesh, MeshError> {
    require_positive("half_base", half_base)?;
    require_positive("height", height)?;
    let l = half_base;
    let base_y = height / 2.0;

    let mut mesh = Mesh::new(material);
    for x in [-l, l] {
        for z in [-l, l] {
            mesh.add_vertex(Vec3::new(x, base_y, z));
        }
    }
    mesh.add_vertex(Vec3::new(0.0, -base_y, 0.0));

    let faces: [&[usize]; 5] = [
        &[0, 1, 3, 2], // base
        &[0, 2, 4],
        &[0, 4, 1],
        &[1, 4, 3],
        &[2, 3, 4],
    ];
    add_faces(&mut mesh, &faces, false, rng)?;
    mesh.compute_vertex_normals();
    Ok(mesh)
}

/// Ring of `n` vertices at height `y`, semi-axes scaled by `scale`
fn add_ring(mesh: &mut Mesh, params: &ConeParams, y: f32, scale: f32) -> Vec<usize> {
    let step = TAU / params.h_appr as f32;
    (0..params.h_appr)
        .map(|j| {
            let t = step * j as f32;
            mesh.add_vertex(Vec3::new(
                scale * params.radius_x * t.cos(),
                y,
                scale * params.radius_z * t.sin(),
            ))
        })
        .collect()
}

/// Triangulated disk closing one end of the cone.
///
/// `rim` is the side ring at that end. Inner rings shrink linearly towards
/// a center vertex; `facing_down` picks the +y (bottom) winding.
fn add_cap<R: Rng + ?Sized>(
    mesh: &mut Mesh,
    params: &ConeParams,
    rim: &[usize],
    y: f32,
    rim_scale: f32,
    facing_down: bool,
    rng: &mut R,
) -> Result<(), MeshError> {
    let n = params.h_appr;
    let r = params.r_appr;

    let mut outer = rim.to_vec();
    for k in 1..r {
        let scale = rim_scale * (r - k) as f32 / r as f32;
        let inner = add_ring(mesh, params, y, scale);
        for j in 0..n {
            let j1 = (j + 1) % n;
            if facing_down {
                mesh.add_polygon(&[outer[j], inner[j], inner[j1]], random_color(rng))?;
                mesh.add_polygon(&[outer[j], inner[j1], outer[j1]], random_color(rng))?;
            } else {
                mesh.add_polygon(&[inner[j], outer[j], outer[j1]], random_color(rng))?;
                mesh.add_polygon(&[inner[j], outer[j1], inner[j1]], random_color(rng))?;
            }
        }
        outer = inner;
    }

    let center = mesh.add_vertex(Vec3::new(0.0, y, 0.0));
    for j in 0..n {
        let j1 = (j + 1) % n;
        if facing_down {
            mesh.add_polygon(&[center, outer[j1], outer[j]], random_color(rng))?;
        } else {
            mesh.add_polygon(&[center, outer[j], outer[j1]], random_color(rng))?;
        }
    }
    Ok(())
}

/// Cone with elliptical cross-section.
///
/// Side vertices sit on `v_appr + 1` levels from the bottom (y = +h/2,
/// full radius) to the top (y = -h/2, `ratio` times the radius). A zero
/// ratio replaces the top level with a single apex and drops the top cap.
pub fn cone<R: Rng + ?Sized>(
    params: &ConeParams,
    material: Material,
    rng: &mut R,
) -> Result<Mesh, MeshError> {
    require_segments("h_appr", 3, params.h_appr)?;
    require_segments("v_appr", 1, params.v_appr)?;
    require_segments("r_appr", 1, params.r_appr)?;
    require_positive("radius_x", params.radius_x)?;
    require_positive("radius_z", params.radius_z)?;
    require_positive("height", params.height)?;
    if params.ratio.is_nan() || params.ratio < 0.0 {
        return Err(MeshError::NegativeRatio(params.ratio));
    }

    let n = params.h_appr;
    let v = params.v_appr;
    let h = params.height;
    let pointed = params.ratio == 0.0;
    let ring_levels = if pointed { v } else { v + 1 };

    let mut mesh = Mesh::new(material);
    let mut levels: Vec<Vec<usize>> = Vec::with_capacity(ring_levels);
    for i in 0..ring_levels {
        let frac = i as f32 / v as f32;
        let scale = 1.0 - (1.0 - params.ratio) * frac;
        levels.push(add_ring(&mut mesh, params, h / 2.0 - h * frac, scale));
    }

    for i in 1..ring_levels {
        let (lower, upper) = (&levels[i - 1], &levels[i]);
        for j in 0..n {
            let j1 = (j + 1) % n;
            mesh.add_polygon(&[upper[j], lower[j], lower[j1]], random_color(rng))?;
            mesh.add_polygon(&[upper[j], lower[j1], upper[j1]], random_color(rng))?;
        }
    }

    if pointed {
        let apex = mesh.add_vertex(Vec3::new(0.0, -h / 2.0, 0.0));
        let lower = &levels[v - 1];
        for j in 0..n {
            mesh.add_polygon(&[apex, lower[j], lower[(j + 1) % n]], random_color(rng))?;
        }
    }

    add_cap(&mut mesh, params, &levels[0], h / 2.0, 1.0, true, rng)?;
    if !pointed {
        add_cap(&mut mesh, params, &levels[v], -h / 2.0, params.ratio, false, rng)?;
    }

    mesh.compute_vertex_normals();
    Ok(mesh)
}
