//! Framebuffer and scan-line polygon fill
//!
//! No depth buffer: visibility comes from culling and painter's ordering
//! upstream, so fill just overwrites.

use std::path::Path;
use thiserror::Error;
use super::types::{Color, Rgb};

/// Below this span width a scanline is a single point
const SPAN_EPSILON: f32 = 1e-6;

/// Error type for framebuffer export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("framebuffer of {width}x{height} does not match its pixel buffer")]
    BufferSize { width: usize, height: usize },
}

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Reallocate for a new canvas size, dropping old contents
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            *self = Framebuffer::new(width, height);
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let p = &self.pixels[idx..idx + 4];
        Some(Color { r: p[0], g: p[1], b: p[2], a: p[3] })
    }

    /// Signed-coordinate pixel write, clipped to the buffer
    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Draw a filled circle at (cx, cy) with given radius and color
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r_sq = radius * radius;
        for y in (cy - radius).max(0)..=(cy + radius).min(self.height as i32 - 1) {
            for x in (cx - radius).max(0)..=(cx + radius).min(self.width as i32 - 1) {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }
        }
    }

    /// Circle outline (midpoint algorithm)
    pub fn draw_circle_outline(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - radius;
        while x >= y {
            for (px, py) in [
                (x, y), (y, x), (-y, x), (-x, y),
                (-x, -y), (-y, -x), (y, -x), (x, -y),
            ] {
                self.plot(cx + px, cy + py, color);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.plot(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Closed outline through `points`
    pub fn draw_polyline(&mut self, points: &[(i32, i32)], color: Color) {
        for (i, &(x0, y0)) in points.iter().enumerate() {
            let (x1, y1) = points[(i + 1) % points.len()];
            self.draw_line(x0, y0, x1, y1, color);
        }
    }

    /// Copy out as an `image` buffer
    pub fn to_image(&self) -> Result<image::RgbaImage, ExportError> {
        image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
            .ok_or(ExportError::BufferSize { width: self.width, height: self.height })
    }

    /// Write the current contents as a PNG file
    pub fn save_png(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.to_image()?.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// A projected vertex ready for fill: screen position plus its paint color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
}

impl ScreenVertex {
    pub fn new(x: f32, y: f32, color: Rgb) -> Self {
        Self { x, y, color }
    }
}

/// Point on edge `a -> b` at scanline `y`; a horizontal edge yields its start.
/// The intercept is exact when both endpoints share an x.
fn edge_at(a: &ScreenVertex, b: &ScreenVertex, y: f32) -> (f32, Rgb) {
    let dy = b.y - a.y;
    if dy == 0.0 {
        return (a.x, a.color);
    }
    let x = a.x + (b.x - a.x) * (y - a.y) / dy;
    let t = (y - a.y) / dy;
    (x, a.color.lerp(b.color, t))
}

/// Walk every pixel center covered by a triangle, top to bottom.
///
/// Vertices are ordered by (y, x). Each scanline spans the long edge
/// (top to bottom vertex) and whichever short edge covers that row; the
/// side the short edges lie on is fixed once per triangle. `plot` receives
/// the pixel and the color interpolated first along the edges, then along
/// the span. Pixels outside `width` x `height` are skipped.
pub fn scan_triangle<F>(width: usize, height: usize, tri: [ScreenVertex; 3], mut plot: F)
where
    F: FnMut(usize, usize, Rgb),
{
    if width == 0 || height == 0 {
        return;
    }
    if tri.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
        return;
    }

    let mut pts = tri;
    pts.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    let [p0, p1, p2] = pts;

    if p2.y - p0.y == 0.0 {
        return;
    }

    // Positive when the middle vertex lies left of the long edge
    let cross = (p2.x - p0.x) * (p1.y - p0.y) - (p2.y - p0.y) * (p1.x - p0.x);
    let short_on_left = cross > 0.0;

    let y_start = p0.y.ceil().max(0.0) as i64;
    let y_end = p2.y.floor().min((height - 1) as f32) as i64;

    for y in y_start..=y_end {
        let yf = y as f32;
        let long = edge_at(&p0, &p2, yf);
        let short = if yf < p1.y {
            edge_at(&p0, &p1, yf)
        } else {
            edge_at(&p1, &p2, yf)
        };
        let (left, right) = if short_on_left { (short, long) } else { (long, short) };

        let span = right.0 - left.0;
        let x_start = left.0.ceil().max(0.0) as i64;
        let x_end = right.0.floor().min((width - 1) as f32) as i64;

        for x in x_start..=x_end {
            let s = if span > SPAN_EPSILON { (x as f32 - left.0) / span } else { 0.0 };
            plot(x as usize, y as usize, left.1.lerp(right.1, s));
        }
    }
}

/// Gouraud fill: vertex colors (clamped at paint time) interpolated per pixel
pub fn fill_triangle_gouraud(fb: &mut Framebuffer, tri: [ScreenVertex; 3]) {
    let (w, h) = (fb.width, fb.height);
    scan_triangle(w, h, tri, |x, y, c| fb.set_pixel(x, y, c.to_color()));
}

/// Single-color fill over the same pixel coverage as the Gouraud path
pub fn fill_triangle_flat(fb: &mut Framebuffer, tri: [ScreenVertex; 3], color: Color) {
    let (w, h) = (fb.width, fb.height);
    scan_triangle(w, h, tri, |x, y, _| fb.set_pixel(x, y, color));
}

/// Fan-triangulate a convex polygon around its first vertex and Gouraud-fill it
pub fn fill_polygon_gouraud(fb: &mut Framebuffer, verts: &[ScreenVertex]) {
    for i in 1..verts.len().saturating_sub(1) {
        fill_triangle_gouraud(fb, [verts[0], verts[i], verts[i + 1]]);
    }
}

/// Fan-triangulate a convex polygon and fill it with one color
pub fn fill_polygon_flat(fb: &mut Framebuffer, verts: &[ScreenVertex], color: Color) {
    for i in 1..verts.len().saturating_sub(1) {
        fill_triangle_flat(fb, [verts[0], verts[i], verts[i + 1]], color);
    }
}
