//! Core types for the rasterizer

use std::ops::{Add, AddAssign, Div, Mul};
use serde::{Serialize, Deserialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const GRAY: Color = Color { r: 128, g: 128, b: 128, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const DARK_RED: Color = Color { r: 128, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const DARK_GREEN: Color = Color { r: 0, g: 128, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear RGB triple.
///
/// Used both for light colors, which may exceed 1.0 when terms accumulate,
/// and for normalized paint colors. Only `to_color` clamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn splat(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }

    pub fn scale(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s)
    }

    /// Each channel capped at 1.0 (paint-time only)
    pub fn clamped(self) -> Self {
        Self::new(self.r.min(1.0), self.g.min(1.0), self.b.min(1.0))
    }

    /// `self * (1 - t) + other * t`, exact at both ends
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        let s = 1.0 - t;
        Self::new(
            self.r * s + other.r * t,
            self.g * s + other.g * t,
            self.b * s + other.b * t,
        )
    }

    /// Quantize to 8-bit, clamping each channel into [0, 1]
    pub fn to_color(self) -> Color {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::new(q(self.r), q(self.g), q(self.b))
    }
}

impl From<Color> for Rgb {
    fn from(c: Color) -> Self {
        Rgb::new(c.r as f32 / 255.0, c.g as f32 / 255.0, c.b as f32 / 255.0)
    }
}

impl Add for Rgb {
    type Output = Rgb;
    fn add(self, other: Rgb) -> Rgb {
        Rgb::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl AddAssign for Rgb {
    fn add_assign(&mut self, other: Rgb) {
        *self = *self + other;
    }
}

/// Component-wise product
impl Mul for Rgb {
    type Output = Rgb;
    fn mul(self, other: Rgb) -> Rgb {
        Rgb::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }
}

impl Mul<f32> for Rgb {
    type Output = Rgb;
    fn mul(self, s: f32) -> Rgb {
        self.scale(s)
    }
}

impl Div<f32> for Rgb {
    type Output = Rgb;
    fn div(self, s: f32) -> Rgb {
        self.scale(1.0 / s)
    }
}

/// Shading mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    Flat,     // One color per polygon from its centroid light
    Gouraud,  // Interpolate vertex colors along scanlines
}

/// Where a polygon's base fill color comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceFill {
    /// Fixed white base, so the light color shows through unchanged
    Neutral,
    /// The polygon's seeded random color
    Random,
    /// No fill; only outlines and glyphs
    None,
}

/// Rasterizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterSettings {
    /// Shading mode
    pub shading: ShadingMode,
    /// Fill color source
    pub fill: FaceFill,
    /// Skip polygons whose world normal points away from the viewer
    pub backface_cull: bool,
    /// Painter's algorithm ordering (no depth buffer either way)
    pub depth_sort: bool,
    /// Outline polygons in `wire_color`
    pub wireframe: bool,
    pub polygon_normals: bool,
    pub vertex_normals: bool,
    /// Rotated axes gizmo in the top-left corner
    pub show_axes: bool,
    pub show_light: bool,
    pub background: Color,
    pub wire_color: Color,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Gouraud,
            fill: FaceFill::Neutral,
            backface_cull: true,
            depth_sort: false,
            wireframe: false,
            polygon_normals: false,
            vertex_normals: false,
            show_axes: true,
            show_light: true,
            background: Color::BLACK,
            wire_color: Color::WHITE,
        }
    }
}
