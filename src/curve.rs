//! 2D parametric curve plotter
//!
//! Samples an ellipse and draws it, with both coordinate axes, through a
//! scale / rotate / shift transform onto a framebuffer.

use log::debug;
use serde::{Serialize, Deserialize};
use crate::rasterizer::{Color, Framebuffer, Vec2};

/// Ellipse `(a cos t, b sin t)` sampled at `n` evenly spaced `t`
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    n: usize,
    a: f32,
    b: f32,
    points: Vec<Vec2>,
}

impl Ellipse {
    pub const MIN_POINTS: usize = 3;

    /// `n` is raised to `MIN_POINTS` if smaller
    pub fn new(n: usize, a: f32, b: f32) -> Self {
        let mut e = Self { n: n.max(Self::MIN_POINTS), a, b, points: Vec::new() };
        e.recalc();
        e
    }

    fn recalc(&mut self) {
        let step = std::f32::consts::TAU / self.n as f32;
        self.points = (0..self.n)
            .map(|i| {
                let t = step * i as f32;
                Vec2::new(self.a * t.cos(), self.b * t.sin())
            })
            .collect();
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn a(&self) -> f32 {
        self.a
    }

    pub fn b(&self) -> f32 {
        self.b
    }

    pub fn set_n(&mut self, n: usize) -> bool {
        if n == self.n || n < Self::MIN_POINTS {
            return false;
        }
        self.n = n;
        self.recalc();
        true
    }

    pub fn set_a(&mut self, a: f32) -> bool {
        if a == self.a {
            return false;
        }
        self.a = a;
        self.recalc();
        true
    }

    pub fn set_b(&mut self, b: f32) -> bool {
        if b == self.b {
            return false;
        }
        self.b = b;
        self.recalc();
        true
    }
}

/// Plane transform applied as scale, then rotation, then shift
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    scale: Vec2,
    /// Degrees
    rotation: f32,
    shift: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            shift: Vec2::default(),
        }
    }
}

impl Transform2D {
    pub fn new(scale: Vec2, rotation: f32, shift: Vec2) -> Self {
        Self { scale, rotation, shift }
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn shift(&self) -> Vec2 {
        self.shift
    }

    /// Negative or unchanged scales are ignored
    pub fn set_scale(&mut self, scale: Vec2) -> bool {
        if scale.x.is_nan() || scale.y.is_nan() || scale.x < 0.0 || scale.y < 0.0 {
            debug!("rejected negative curve scale ({}, {})", scale.x, scale.y);
            return false;
        }
        if scale == self.scale {
            return false;
        }
        self.scale = scale;
        true
    }

    pub fn set_rotation(&mut self, degrees: f32) -> bool {
        if degrees == self.rotation {
            return false;
        }
        self.rotation = degrees;
        true
    }

    pub fn set_shift(&mut self, shift: Vec2) -> bool {
        if shift == self.shift {
            return false;
        }
        self.shift = shift;
        true
    }

    /// Follow a canvas resize by `ratio`
    pub fn rescale(&mut self, ratio: f32) -> bool {
        if !ratio.is_finite() || ratio <= 0.0 {
            return false;
        }
        let scale = Vec2::new(self.scale.x * ratio, self.scale.y * ratio);
        let shift = Vec2::new(self.shift.x * ratio, self.shift.y * ratio);
        let scaled = self.set_scale(scale);
        let shifted = self.set_shift(shift);
        scaled || shifted
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        let (s, c) = self.rotation.to_radians().sin_cos();
        let x = p.x * self.scale.x;
        let y = p.y * self.scale.y;
        Vec2::new(x * c - y * s + self.shift.x, x * s + y * c + self.shift.y)
    }
}

pub const AXIS_X_COLOR: Color = Color::BLUE;
pub const AXIS_Y_COLOR: Color = Color::DARK_GREEN;

/// Draw both axes and the closed curve, origin at the framebuffer center
pub fn plot_curve(fb: &mut Framebuffer, curve: &Ellipse, transform: &Transform2D, color: Color) {
    let cx = fb.width as f32 / 2.0;
    let cy = fb.height as f32 / 2.0;
    let to_screen = |p: Vec2| {
        let q = transform.apply(p);
        ((q.x + cx).round() as i32, (q.y + cy).round() as i32)
    };

    // Spans the whole canvas at unit scale
    let reach = (fb.width + fb.height) as f32;
    let arrow = [Vec2::new(0.6, 0.2), Vec2::new(1.0, 0.0), Vec2::new(0.6, -0.2)];
    for (flip, axis_color) in [(false, AXIS_X_COLOR), (true, AXIS_Y_COLOR)] {
        // The y axis is the x axis turned a quarter
        let turn = |p: Vec2| if flip { Vec2::new(-p.y, p.x) } else { p };
        let (x0, y0) = to_screen(turn(Vec2::new(-reach, 0.0)));
        let (x1, y1) = to_screen(turn(Vec2::new(reach, 0.0)));
        fb.draw_line(x0, y0, x1, y1, axis_color);
        let head: Vec<(i32, i32)> = arrow.iter().map(|&p| to_screen(turn(p))).collect();
        for pair in head.windows(2) {
            fb.draw_line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, axis_color);
        }
    }

    let outline: Vec<(i32, i32)> = curve.points().iter().map(|&p| to_screen(p)).collect();
    fb.draw_polyline(&outline, color);
}
