//! Per-vertex Phong illumination

use crate::mesh::{Material, Mesh};
use crate::rasterizer::{Rgb, Vec3};
use super::light::Light;

/// Light reaching one vertex: ambient, plus diffuse and specular terms
/// scaled by distance attenuation. The sum is left unclamped.
pub fn vertex_light(
    position: Vec3,
    normal: Vec3,
    material: &Material,
    light: &Light,
    light_pos: Vec3,
) -> Rgb {
    let mut color = material.ambient * light.ambient;

    let to_light = light_pos - position;
    let attenuation = light.attenuation(to_light.len());
    let l = to_light.normalize();
    let n = normal.normalize();

    let cos_incidence = l.dot(n);
    if cos_incidence > 0.0 {
        color += material.diffuse * light.intensity * (cos_incidence * attenuation);
    }

    let cos_specular = l.reflect(n).dot(Vec3::VIEW);
    if cos_specular > 0.0 {
        color += material.specular * light.intensity * (cos_specular.powf(material.gloss) * attenuation);
    }

    color
}

/// Recolor every vertex of an already transformed mesh
pub fn illuminate(mesh: &mut Mesh, light: &Light) {
    let light_pos = light.world_position();
    let material = mesh.material;
    for v in &mut mesh.vertices {
        v.light = vertex_light(v.world, v.normal_world, &material, light, light_pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> Material {
        Material {
            ambient: Rgb::splat(0.1),
            diffuse: Rgb::new(1.0, 0.5, 0.0),
            specular: Rgb::splat(0.5),
            gloss: 8.0,
        }
    }

    fn light() -> Light {
        Light { linear: 0.0, constant: 1.0, ambient: Rgb::splat(0.5), ..Default::default() }
    }

    #[test]
    fn test_same_inputs_same_light() {
        let l = light();
        let pos = Vec3::new(10.0, -20.0, 5.0);
        let n = Vec3::new(0.3, -0.4, -0.8);
        let a = vertex_light(pos, n, &material(), &l, l.world_position());
        let b = vertex_light(pos, n, &material(), &l, l.world_position());
        assert_eq!(a, b);
    }

    #[test]
    fn test_facing_away_gets_ambient_only() {
        let l = light();
        let light_pos = Vec3::new(-100.0, 0.0, 0.0);
        // Normal points away from the light and the reflection grazes the view axis
        let c = vertex_light(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), &material(), &l, light_pos);
        assert!((c.r - 0.05).abs() < 1e-6);
        assert!((c.g - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_head_on_diffuse() {
        let l = Light { linear: 0.0, constant: 1.0, ambient: Rgb::BLACK, ..Default::default() };
        let light_pos = Vec3::new(0.0, 0.0, -100.0);
        let m = Material { specular: Rgb::BLACK, ..material() };
        let c = vertex_light(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), &m, &l, light_pos);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.g - 0.5).abs() < 1e-6);
        assert!(c.b.abs() < 1e-6);
    }

    #[test]
    fn test_specular_head_on_is_attenuated() {
        let l = Light { linear: 0.01, constant: 1.0, ambient: Rgb::BLACK, ..Default::default() };
        let m = Material { diffuse: Rgb::BLACK, ..material() };
        // Distance 100 halves the light
        let c = vertex_light(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), &m, &l, Vec3::new(0.0, 0.0, -100.0));
        for ch in [c.r, c.g, c.b] {
            assert!((ch - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_specular_follows_gloss() {
        let l = Light { linear: 0.0, constant: 1.0, ambient: Rgb::BLACK, ..Default::default() };
        let m = Material { diffuse: Rgb::BLACK, gloss: 2.0, ..material() };
        // Light 60 degrees off the normal, so the reflection is 60 degrees off the view axis
        let light_pos = Vec3::new(100.0 * 60f32.to_radians().sin(), 0.0, -50.0);
        let c = vertex_light(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), &m, &l, light_pos);
        assert!((c.r - 0.5 * 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_specular_skipped_when_reflection_leaves_view() {
        let l = Light { linear: 0.0, constant: 1.0, ambient: Rgb::BLACK, ..Default::default() };
        let light_pos = Vec3::new(100.0, 0.0, -100.0);
        // Lit from the side, reflection points back along -z
        let c = vertex_light(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), &material(), &l, light_pos);
        assert!((c.r - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_light_not_clamped() {
        let l = Light { linear: 0.0, constant: 1.0, intensity: Rgb::splat(3.0), ..Default::default() };
        let light_pos = Vec3::new(0.0, 0.0, -100.0);
        let c = vertex_light(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), &material(), &l, light_pos);
        assert!(c.r > 1.0);
    }

    #[test]
    fn test_attenuation_dims_far_vertices() {
        let l = Light { linear: 0.01, constant: 1.0, ambient: Rgb::BLACK, ..Default::default() };
        let m = material();
        let light_pos = Vec3::new(0.0, 0.0, -100.0);
        let n = Vec3::new(0.0, 0.0, -1.0);
        let near = vertex_light(Vec3::new(0.0, 0.0, -50.0), n, &m, &l, light_pos);
        let far = vertex_light(Vec3::new(0.0, 0.0, 200.0), n, &m, &l, light_pos);
        assert!(far.r < near.r);
    }
}
