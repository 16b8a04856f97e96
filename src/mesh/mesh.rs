//! Polygon mesh storage
//!
//! Vertices and polygons live in flat arenas owned by `Mesh` and refer to
//! each other by index. Polygons list their vertices in winding order;
//! vertices keep the indices of the polygons that use them, which is only
//! read back for normal averaging and glyph visibility.

use serde::{Serialize, Deserialize};
use crate::rasterizer::{Mat4, Rgb, Vec3};
use super::generators::MeshError;

/// Length of a polygon's local normal. Only affects how long the normal
/// glyphs are drawn; lighting normalizes.
pub const NORMAL_GLYPH_LENGTH: f32 = 15.0;

/// Per-mesh reflectance coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    /// Specular exponent
    pub gloss: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Rgb::splat(0.2),
            diffuse: Rgb::splat(0.8),
            specular: Rgb::splat(0.5),
            gloss: 20.0,
        }
    }
}

/// A mesh vertex
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub local: Vec3,
    pub world: Vec3,
    pub normal_local: Vec3,
    pub normal_world: Vec3,
    /// Accumulated light, unclamped
    pub light: Rgb,
    /// Polygons using this vertex
    pub polygons: Vec<usize>,
}

impl Vertex {
    pub fn new(local: Vec3) -> Self {
        Self {
            local,
            world: local,
            normal_local: Vec3::ZERO,
            normal_world: Vec3::ZERO,
            light: Rgb::BLACK,
            polygons: Vec::new(),
        }
    }
}

/// A planar face (triangle or quad)
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<usize>,
    pub normal_local: Vec3,
    pub normal_world: Vec3,
    /// Fill color for random paint mode
    pub color: Rgb,
}

/// A polyhedron: vertex and polygon arenas plus material
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub polygons: Vec<Polygon>,
    pub material: Material,
}

impl Mesh {
    pub fn new(material: Material) -> Self {
        Self {
            vertices: Vec::new(),
            polygons: Vec::new(),
            material,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Add a vertex, returns its index
    pub fn add_vertex(&mut self, local: Vec3) -> usize {
        self.vertices.push(Vertex::new(local));
        self.vertices.len() - 1
    }

    /// Add a polygon over existing vertices, returns its index.
    ///
    /// The local normal follows the right-hand rule on the first three
    /// vertices, so the caller's winding decides which way the face points.
    pub fn add_polygon(&mut self, indices: &[usize], color: Rgb) -> Result<usize, MeshError> {
        if !(3..=4).contains(&indices.len()) {
            return Err(MeshError::InvalidPolygon {
                reason: format!("{} vertices, expected 3 or 4", indices.len()),
            });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.vertices.len()) {
            return Err(MeshError::InvalidPolygon {
                reason: format!("vertex index {} out of range ({} vertices)", bad, self.vertices.len()),
            });
        }

        let p0 = self.vertices[indices[0]].local;
        let p1 = self.vertices[indices[1]].local;
        let p2 = self.vertices[indices[2]].local;
        let normal = (p1 - p0).cross(p2 - p0).normalize() * NORMAL_GLYPH_LENGTH;

        let index = self.polygons.len();
        for &vi in indices {
            self.vertices[vi].polygons.push(index);
        }
        self.polygons.push(Polygon {
            vertices: indices.to_vec(),
            normal_local: normal,
            normal_world: normal,
            color,
        });
        Ok(index)
    }

    /// Set each vertex normal to the plain average of its polygons' normals
    pub fn compute_vertex_normals(&mut self) {
        let polygons = &self.polygons;
        for v in &mut self.vertices {
            let mut sum = Vec3::ZERO;
            for &pi in &v.polygons {
                sum += polygons[pi].normal_local;
            }
            v.normal_local = if v.polygons.is_empty() {
                Vec3::ZERO
            } else {
                sum / v.polygons.len() as f32
            };
            v.normal_world = v.normal_local;
        }
    }

    /// Move every position through `world` and every normal through `normal`
    pub fn apply_transform(&mut self, world: &Mat4, normal: &Mat4) {
        for v in &mut self.vertices {
            v.world = world.transform_point(v.local);
            v.normal_world = normal.transform_vector(v.normal_local);
        }
        for p in &mut self.polygons {
            p.normal_world = normal.transform_vector(p.normal_local);
        }
    }

    /// World-space centroid of a polygon
    pub fn midpoint(&self, polygon: usize) -> Vec3 {
        let poly = &self.polygons[polygon];
        let mut sum = Vec3::ZERO;
        for &vi in &poly.vertices {
            sum += self.vertices[vi].world;
        }
        sum / poly.vertices.len() as f32
    }

    /// Average light over a polygon's vertices
    pub fn mid_light(&self, polygon: usize) -> Rgb {
        let poly = &self.polygons[polygon];
        let mut sum = Rgb::BLACK;
        for &vi in &poly.vertices {
            sum += self.vertices[vi].light;
        }
        sum / poly.vertices.len() as f32
    }
}
