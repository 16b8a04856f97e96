//! Scene configuration loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files.

use std::fs;
use std::path::Path;
use log::info;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::mesh::{Material, MeshError, ShapeKind};
use crate::rasterizer::{Axis, Mat4, RasterSettings, Vec3, HEIGHT, WIDTH};
use super::light::Light;
use super::transform::ViewPreset;

/// Error type for scene configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),
    #[error("Invalid scene: {0}")]
    Invalid(String),
}

/// Saved view state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Per-axis scale
    pub scale: Vec3,
    pub rotation: Mat4,
    pub shift: Vec3,
    pub preset: ViewPreset,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation: Mat4::IDENTITY.rotated(Axis::Y, -45.0).rotated(Axis::X, -35.0),
            shift: Vec3::ZERO,
            preset: ViewPreset::Orbit,
        }
    }
}

/// Everything needed to rebuild a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub shape: ShapeKind,
    pub material: Material,
    pub light: Light,
    pub view: ViewConfig,
    pub render: RasterSettings,
    pub width: usize,
    pub height: usize,
    /// Seed for face colors
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::default(),
            material: Material::default(),
            light: Light::default(),
            view: ViewConfig::default(),
            render: RasterSettings::default(),
            width: WIDTH,
            height: HEIGHT,
            seed: 0,
        }
    }
}

/// Load a scene configuration from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SceneConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: SceneConfig = ron::from_str(&contents)?;
    info!("loaded scene {} ({})", path.display(), config.shape.name());
    Ok(config)
}

/// Save a scene configuration to a RON file
pub fn save_config<P: AsRef<Path>>(config: &SceneConfig, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    fs::write(path, config_to_string(config)?)?;
    info!("saved scene {}", path.display());
    Ok(())
}

/// Pretty RON text for a configuration
pub fn config_to_string(config: &SceneConfig) -> Result<String, ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(config, pretty)?)
}

/// Load a scene configuration from a RON string (for embedded scenes or testing)
pub fn load_config_from_str(s: &str) -> Result<SceneConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::ConeParams;
    use crate::scene::Scene;

    #[test]
    fn test_default_config_roundtrip() {
        let cfg = SceneConfig::default();
        let text = config_to_string(&cfg).unwrap();
        let back = load_config_from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_scene_snapshot_roundtrip() {
        let mut cfg = SceneConfig::default();
        cfg.shape = ShapeKind::Cone(ConeParams { h_appr: 6, ..Default::default() });
        cfg.view.scale = Vec3::new(1.5, 1.5, 1.0);
        cfg.view.shift = Vec3::new(10.0, -5.0, 0.0);
        cfg.seed = 42;
        let scene = Scene::from_config(&cfg).unwrap();
        assert_eq!(scene.to_config(), cfg);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut cfg = SceneConfig::default();
        cfg.view.scale = Vec3::new(-1.0, 1.0, 1.0);
        assert!(matches!(Scene::from_config(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg = SceneConfig::default();
        cfg.shape = ShapeKind::Cone(ConeParams { h_appr: 2, ..Default::default() });
        assert!(matches!(Scene::from_config(&cfg), Err(ConfigError::Mesh(_))));
    }

    fn rejected(edit: impl FnOnce(&mut SceneConfig)) -> bool {
        let mut cfg = SceneConfig::default();
        edit(&mut cfg);
        matches!(Scene::from_config(&cfg), Err(ConfigError::Invalid(_)))
    }

    #[test]
    fn test_rejects_bad_light() {
        assert!(rejected(|c| c.light.distance = 0.0));
        assert!(rejected(|c| c.light.distance = f32::NAN));
        assert!(rejected(|c| c.light.distance = f32::INFINITY));
        assert!(rejected(|c| {
            c.light.linear = -0.01;
            c.light.constant = 0.0;
        }));
        assert!(rejected(|c| c.light.constant = 0.0));
        assert!(rejected(|c| c.light.linear = f32::NAN));
        assert!(rejected(|c| c.light.rotation.m[0][0] = f32::NAN));
    }

    #[test]
    fn test_rejects_non_finite_view() {
        assert!(rejected(|c| c.view.scale = Vec3::new(f32::NAN, 1.0, 1.0)));
        assert!(rejected(|c| c.view.scale = Vec3::new(1.0, f32::INFINITY, 1.0)));
        assert!(rejected(|c| c.view.shift = Vec3::new(0.0, 0.0, f32::NEG_INFINITY)));
        assert!(rejected(|c| c.view.rotation.m[1][2] = f32::NAN));
    }

    #[test]
    fn test_loaded_light_keeps_positive_attenuation() {
        let mut cfg = SceneConfig::default();
        cfg.light.linear = 0.0;
        cfg.light.constant = crate::scene::MIN_CONSTANT_ATTENUATION;
        let scene = Scene::from_config(&cfg).unwrap();
        assert!(scene.light().attenuation(0.0) > 0.0);
        for v in &scene.mesh().vertices {
            assert!(v.light.r >= 0.0 && v.light.g >= 0.0 && v.light.b >= 0.0);
        }
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(load_config_from_str("Scene(("), Err(ConfigError::Parse(_))));
    }
}
