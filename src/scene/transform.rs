//! View transform: independent scale, rotation, shift and viewport matrices
//!
//! The point transform is `shift * rotation^T * scale * viewport`, so the
//! viewport projection hits a point first and the shift last. The normal
//! transform is the cofactor of that product. Both are recomputed
//! synchronously whenever an input changes.

use log::debug;
use serde::{Serialize, Deserialize};
use crate::rasterizer::{Axis, Mat4, Vec3};

/// Fixed viewport projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewPreset {
    /// Free rotation, no projection
    #[default]
    Orbit,
    /// Orthographic onto the xy plane
    Front,
    /// Orthographic onto the zy plane
    Side,
    /// Orthographic onto the xz plane
    Top,
}

impl ViewPreset {
    /// Projection matrix: identity with the dropped axis' row zeroed
    pub fn viewport(self) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        match self {
            ViewPreset::Orbit => {}
            ViewPreset::Front => m.m[2] = [0.0; 4],
            ViewPreset::Side => m.m[0] = [0.0; 4],
            ViewPreset::Top => m.m[1] = [0.0; 4],
        }
        m
    }

    /// Rotation that turns the projected plane to face the viewer
    fn rotation(self) -> Option<Mat4> {
        match self {
            ViewPreset::Orbit => None,
            ViewPreset::Front => Some(Mat4::IDENTITY),
            ViewPreset::Side => Some(Mat4::IDENTITY.rotated(Axis::Y, -90.0)),
            ViewPreset::Top => Some(Mat4::IDENTITY.rotated(Axis::X, -90.0)),
        }
    }
}

/// `shift * rotation^T * scale * viewport`
pub fn compose_world(shift: &Mat4, rotation: &Mat4, scale: &Mat4, viewport: &Mat4) -> Mat4 {
    *shift * rotation.transposed() * *scale * *viewport
}

/// Camera/view state and its derived transforms
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    scale: Mat4,
    rotation: Mat4,
    shift: Mat4,
    viewport: Mat4,
    preset: ViewPreset,
    world: Mat4,
    normal: Mat4,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        let mut view = Self {
            scale: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            shift: Mat4::IDENTITY,
            viewport: Mat4::IDENTITY,
            preset: ViewPreset::Orbit,
            world: Mat4::IDENTITY,
            normal: Mat4::IDENTITY,
        };
        view.recompute();
        view
    }

    pub fn scale(&self) -> &Mat4 {
        &self.scale
    }

    pub fn rotation(&self) -> &Mat4 {
        &self.rotation
    }

    pub fn shift(&self) -> &Mat4 {
        &self.shift
    }

    pub fn viewport(&self) -> &Mat4 {
        &self.viewport
    }

    pub fn preset(&self) -> ViewPreset {
        self.preset
    }

    /// Point transform
    pub fn world(&self) -> &Mat4 {
        &self.world
    }

    /// Normal transform
    pub fn normal(&self) -> &Mat4 {
        &self.normal
    }

    fn recompute(&mut self) {
        self.world = compose_world(&self.shift, &self.rotation, &self.scale, &self.viewport);
        self.normal = self.world.normal_matrix();
    }

    /// Per-axis scale. Negative or unchanged values are ignored.
    pub fn set_scale(&mut self, s: Vec3) -> bool {
        if s.x.is_nan() || s.y.is_nan() || s.z.is_nan() || s.x < 0.0 || s.y < 0.0 || s.z < 0.0 {
            debug!("rejected negative scale ({}, {}, {})", s.x, s.y, s.z);
            return false;
        }
        if s == self.scale.diagonal() {
            return false;
        }
        self.scale = Mat4::scaling(s.x, s.y, s.z);
        self.recompute();
        true
    }

    /// Add `delta` to every axis of the scale
    pub fn zoom_by(&mut self, delta: f32) -> bool {
        let d = self.scale.diagonal();
        self.set_scale(Vec3::new(d.x + delta, d.y + delta, d.z + delta))
    }

    pub fn set_rotation(&mut self, rotation: Mat4) -> bool {
        if rotation == self.rotation {
            return false;
        }
        self.rotation = rotation;
        self.recompute();
        true
    }

    /// Compose an incremental rotation onto the current one
    pub fn rotate(&mut self, axis: Axis, degrees: f32) -> bool {
        if degrees == 0.0 {
            return false;
        }
        self.rotation = self.rotation.rotated(axis, degrees);
        self.recompute();
        true
    }

    pub fn set_shift(&mut self, t: Vec3) -> bool {
        if t == self.shift.translation_part() {
            return false;
        }
        self.shift = Mat4::translation(t);
        self.recompute();
        true
    }

    pub fn translate_by(&mut self, d: Vec3) -> bool {
        if d == Vec3::ZERO {
            return false;
        }
        self.shift = self.shift.translated(d);
        self.recompute();
        true
    }

    /// Switch the viewport projection. Canonical presets also reset the
    /// rotation; `Orbit` leaves it alone.
    pub fn set_preset(&mut self, preset: ViewPreset) {
        self.preset = preset;
        self.viewport = preset.viewport();
        if let Some(rotation) = preset.rotation() {
            self.rotation = rotation;
        }
        self.recompute();
    }

    /// Free view from the classic isometric angle
    pub fn isometric(&mut self) {
        self.preset = ViewPreset::Orbit;
        self.viewport = ViewPreset::Orbit.viewport();
        self.rotation = Mat4::IDENTITY.rotated(Axis::Y, -45.0).rotated(Axis::X, -35.0);
        self.recompute();
    }

    /// Follow a canvas resize by `ratio`: scale uniformly, and scale the
    /// shift offset while keeping its diagonal
    pub fn rescale(&mut self, ratio: f32) -> bool {
        if !ratio.is_finite() || ratio <= 0.0 || ratio == 1.0 {
            return false;
        }
        for i in 0..3 {
            self.scale.m[i][i] *= ratio;
            self.shift.m[i][3] *= ratio;
        }
        self.recompute();
        true
    }
}
