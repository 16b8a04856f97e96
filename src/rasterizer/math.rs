//! Vector and matrix math for the transform pipeline
//!
//! Matrices are row-major and act on column vectors (`p' = M * p`), so the
//! translation lives in the last column and `a * b` applies `b` first.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const VIEW: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Mirror `self` about the plane with unit normal `n`
    pub fn reflect(self, n: Vec3) -> Vec3 {
        self - n.scale(2.0 * self.dot(n))
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    fn div(self, s: f32) -> Vec3 {
        self.scale(1.0 / s)
    }
}

/// 2D Vector (curve samples, screen points)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Principal rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Sine and cosine of an angle in degrees, exact for quarter turns
/// so canonical views stay axis-aligned.
fn sin_cos_deg(degrees: f32) -> (f32, f32) {
    if degrees % 90.0 == 0.0 {
        let quadrant = (degrees / 90.0).rem_euclid(4.0) as i32;
        return match quadrant {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        };
    }
    degrees.to_radians().sin_cos()
}

/// 4x4 homogeneous matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_rows(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// Diagonal scale matrix
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Create translation matrix
    pub fn translation(t: Vec3) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, t.x],
            [0.0, 1.0, 0.0, t.y],
            [0.0, 0.0, 1.0, t.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about a principal axis
    pub fn rotation(axis: Axis, degrees: f32) -> Self {
        let (s, c) = sin_cos_deg(degrees);
        match axis {
            Axis::X => Self::from_rows([
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, -s, 0.0],
                [0.0, s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            Axis::Y => Self::from_rows([
                [c, 0.0, s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [-s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            Axis::Z => Self::from_rows([
                [c, -s, 0.0, 0.0],
                [s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }

    /// Post-multiply by a rotation (`self * R`), the incremental form
    /// used for drag gestures.
    pub fn rotated(&self, axis: Axis, degrees: f32) -> Self {
        *self * Mat4::rotation(axis, degrees)
    }

    /// Post-multiply by a translation (`self * T`)
    pub fn translated(&self, t: Vec3) -> Self {
        *self * Mat4::translation(t)
    }

    pub fn transposed(&self) -> Self {
        let mut result = [[0.0; 4]; 4];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.m[j][i];
            }
        }
        Self::from_rows(result)
    }

    /// Upper-left 3x3 diagonal
    pub fn diagonal(&self) -> Vec3 {
        Vec3::new(self.m[0][0], self.m[1][1], self.m[2][2])
    }

    /// Translation column
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Transform a point (w = 1)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        )
    }

    /// Transform a direction (w = 0)
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Cofactor matrix of the upper-left 3x3 block, translation zeroed.
    ///
    /// cofactor(M) = det(M) * inverse(M)^T, so after normalization it maps
    /// normals the same way the inverse-transpose does. Unlike the inverse
    /// it stays defined for the singular orthographic viewports.
    pub fn normal_matrix(&self) -> Self {
        let m = &self.m;
        Self::from_rows([
            [
                m[1][1] * m[2][2] - m[1][2] * m[2][1],
                m[1][2] * m[2][0] - m[1][0] * m[2][2],
                m[1][0] * m[2][1] - m[1][1] * m[2][0],
                0.0,
            ],
            [
                m[0][2] * m[2][1] - m[0][1] * m[2][2],
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                m[0][1] * m[2][0] - m[0][0] * m[2][1],
                0.0,
            ],
            [
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
                m[0][2] * m[1][0] - m[0][0] * m[1][2],
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
                0.0,
            ],
            [0.0, 0.0, 0.0, 0.0],
        ])
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    /// Multiply two 4x4 matrices
    fn mul(self, other: Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result[i][j] += self.m[i][k] * other.m[k][j];
                }
            }
        }
        Mat4::from_rows(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_reflect_flips_normal_component() {
        let n = Vec3::new(0.0, 0.0, -1.0);
        let v = Vec3::new(1.0, 0.0, -1.0);
        let r = v.reflect(n);
        assert!((r.x - 1.0).abs() < 1e-6);
        assert!((r.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_quarter_turns_are_exact() {
        let r = Mat4::rotation(Axis::X, -90.0);
        assert_eq!(r.m[1][1], 0.0);
        assert_eq!(r.m[1][2], 1.0);
        assert_eq!(r.m[2][1], -1.0);
        let half = Mat4::rotation(Axis::Z, 180.0);
        assert_eq!(half.m[0][0], -1.0);
        assert_eq!(half.m[0][1], 0.0);
    }

    #[test]
    fn test_rotation_y_maps_z_to_x() {
        let r = Mat4::rotation(Axis::Y, 90.0);
        let p = r.transform_point(Vec3::new(0.0, 0.0, 1.0));
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn test_multiply_applies_right_operand_first() {
        let t = Mat4::translation(Vec3::new(10.0, 0.0, 0.0));
        let s = Mat4::scaling(2.0, 2.0, 2.0);
        let p = (t * s).transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn test_transpose_inverts_rotation() {
        let r = Mat4::rotation(Axis::Z, 37.0);
        let i = r * r.transposed();
        for (a, row) in i.m.iter().enumerate() {
            for (b, v) in row.iter().enumerate() {
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((v - expected).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        // Non-uniform scale tilts a 45 degree surface; the normal must follow.
        let m = Mat4::scaling(2.0, 1.0, 1.0);
        let tangent = m.transform_vector(Vec3::new(1.0, -1.0, 0.0));
        let normal = m.normal_matrix().transform_vector(Vec3::new(1.0, 1.0, 0.0));
        assert!(tangent.dot(normal).abs() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_ignores_translation() {
        let m = Mat4::translation(Vec3::new(5.0, 6.0, 7.0));
        let n = m.normal_matrix().transform_vector(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(n, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(m.normal_matrix().m[3][3], 0.0);
    }
}
