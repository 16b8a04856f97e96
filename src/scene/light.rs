//! Point light orbiting the scene origin

use log::debug;
use serde::{Serialize, Deserialize};
use crate::rasterizer::{Axis, Mat4, Rgb, Vec3};

/// Lower bound for the constant attenuation term
pub const MIN_CONSTANT_ATTENUATION: f32 = 1e-3;

/// A point light at `distance` along +z, swung around by `rotation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub rotation: Mat4,
    pub distance: f32,
    pub ambient: Rgb,
    pub intensity: Rgb,
    /// Linear attenuation coefficient
    pub linear: f32,
    /// Constant attenuation coefficient
    pub constant: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            rotation: Mat4::IDENTITY.rotated(Axis::Y, -150.0).rotated(Axis::X, 30.0),
            distance: 300.0,
            ambient: Rgb::splat(0.3),
            intensity: Rgb::WHITE,
            linear: 0.002,
            constant: 1.0,
        }
    }
}

impl Light {
    /// `rotation^T * (0, 0, distance)`
    pub fn world_position(&self) -> Vec3 {
        self.rotation
            .transposed()
            .transform_point(Vec3::new(0.0, 0.0, self.distance))
    }

    /// Intensity factor at distance `d`
    pub fn attenuation(&self, d: f32) -> f32 {
        1.0 / (self.linear * d + self.constant)
    }

    pub fn valid_distance(distance: f32) -> bool {
        distance.is_finite() && distance > 0.0
    }

    /// Keeps `linear * d + constant` positive for every `d >= 0`
    pub fn valid_attenuation(linear: f32, constant: f32) -> bool {
        linear.is_finite() && linear >= 0.0 && constant.is_finite() && constant >= MIN_CONSTANT_ATTENUATION
    }

    /// Returns false (and keeps the old value) for non-positive or
    /// unchanged distances
    pub fn set_distance(&mut self, distance: f32) -> bool {
        if !Self::valid_distance(distance) {
            debug!("rejected light distance {}", distance);
            return false;
        }
        if distance == self.distance {
            return false;
        }
        self.distance = distance;
        true
    }

    /// Returns false for a negative linear term or a constant term below
    /// `MIN_CONSTANT_ATTENUATION`
    pub fn set_attenuation(&mut self, linear: f32, constant: f32) -> bool {
        if !Self::valid_attenuation(linear, constant) {
            debug!("rejected attenuation linear={} constant={}", linear, constant);
            return false;
        }
        if linear == self.linear && constant == self.constant {
            return false;
        }
        self.linear = linear;
        self.constant = constant;
        true
    }

    pub fn rotate(&mut self, axis: Axis, degrees: f32) {
        self.rotation = self.rotation.rotated(axis, degrees);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attenuation_non_increasing() {
        let light = Light::default();
        let mut prev = light.attenuation(0.0);
        assert!((prev - 1.0).abs() < 1e-6);
        for i in 1..100 {
            let a = light.attenuation(i as f32 * 10.0);
            assert!(a <= prev);
            prev = a;
        }
    }

    #[test]
    fn test_position_keeps_distance() {
        let light = Light::default();
        assert!((light.world_position().len() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_default_light_in_front_of_scene() {
        // Viewer looks along +z, so "in front" is negative z
        let p = Light::default().world_position();
        assert!(p.z < 0.0);
        assert!(p.x > 0.0);
        assert!(p.y < 0.0);
    }

    #[test]
    fn test_identity_rotation_places_light_on_z() {
        let light = Light { rotation: Mat4::IDENTITY, distance: 120.0, ..Default::default() };
        assert_eq!(light.world_position(), Vec3::new(0.0, 0.0, 120.0));
    }

    #[test]
    fn test_rejects_bad_distance() {
        let mut light = Light::default();
        assert!(!light.set_distance(0.0));
        assert!(!light.set_distance(-5.0));
        assert!(!light.set_distance(f32::NAN));
        assert!(!light.set_distance(f32::INFINITY));
        assert!(!light.set_distance(300.0));
        assert!(light.set_distance(450.0));
        assert_eq!(light.distance, 450.0);
    }

    #[test]
    fn test_rejects_bad_attenuation() {
        let mut light = Light::default();
        assert!(!light.set_attenuation(-0.1, 1.0));
        assert!(!light.set_attenuation(0.1, 0.0));
        assert!(!light.set_attenuation(0.1, MIN_CONSTANT_ATTENUATION / 2.0));
        assert!(!light.set_attenuation(f32::NAN, 1.0));
        assert!(light.set_attenuation(0.1, 2.0));
        assert_eq!((light.linear, light.constant), (0.1, 2.0));
    }
}
