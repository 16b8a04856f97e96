//! One viewer session: mesh, view, light and render settings
//!
//! Every mutation goes through a setter that recomputes transforms and
//! lighting before returning, and reports whether anything changed.
//! Changes the UI may want to mirror are also queued as `SceneEvent`s.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::mesh::{generate, Material, Mesh, MeshError, ShapeKind};
use crate::rasterizer::{
    visible_polygons, Axis, Frame, FrameStats, Framebuffer, Mat4, RasterSettings, RenderBackend,
    Rgb, SoftwareBackend, Vec3,
};
use super::config::{ConfigError, SceneConfig, ViewConfig};
use super::light::Light;
use super::lighting::illuminate;
use super::transform::{ViewPreset, ViewTransform};

/// Change notification, drained by the UI with `Scene::drain_events`
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    ScaleChanged(Mat4),
    RotationChanged(Mat4),
    ShiftChanged(Mat4),
    LightDistanceChanged(f32),
    /// New point transform, after every view recompute
    WorldChanged(Mat4),
}

pub struct Scene {
    shape: ShapeKind,
    mesh: Mesh,
    view: ViewTransform,
    light: Light,
    settings: RasterSettings,
    width: usize,
    height: usize,
    seed: u64,
    rng: StdRng,
    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new(shape: ShapeKind, seed: u64) -> Result<Self, MeshError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mesh = generate(&shape, Material::default(), &mut rng)?;
        let mut scene = Self {
            shape,
            mesh,
            view: ViewTransform::new(),
            light: Light::default(),
            settings: RasterSettings::default(),
            width: crate::rasterizer::WIDTH,
            height: crate::rasterizer::HEIGHT,
            seed,
            rng,
            events: Vec::new(),
        };
        scene.update();
        Ok(scene)
    }

    /// Build a session from a saved configuration
    pub fn from_config(cfg: &SceneConfig) -> Result<Self, ConfigError> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ConfigError::Invalid(format!("canvas {}x{}", cfg.width, cfg.height)));
        }
        let s = cfg.view.scale;
        if !s.is_finite() || s.x < 0.0 || s.y < 0.0 || s.z < 0.0 {
            return Err(ConfigError::Invalid(format!("scale ({}, {}, {})", s.x, s.y, s.z)));
        }
        let t = cfg.view.shift;
        if !t.is_finite() {
            return Err(ConfigError::Invalid(format!("shift ({}, {}, {})", t.x, t.y, t.z)));
        }
        if !cfg.view.rotation.is_finite() || !cfg.light.rotation.is_finite() {
            return Err(ConfigError::Invalid("non-finite rotation".to_string()));
        }
        if !Light::valid_distance(cfg.light.distance) {
            return Err(ConfigError::Invalid(format!("light distance {}", cfg.light.distance)));
        }
        if !Light::valid_attenuation(cfg.light.linear, cfg.light.constant) {
            return Err(ConfigError::Invalid(format!(
                "attenuation linear={} constant={}",
                cfg.light.linear, cfg.light.constant
            )));
        }

        let mut scene = Scene::new(cfg.shape, cfg.seed)?;
        scene.mesh.material = cfg.material;
        scene.light = cfg.light.clone();
        scene.settings = cfg.render.clone();
        scene.width = cfg.width;
        scene.height = cfg.height;

        scene.view.set_preset(cfg.view.preset);
        scene.view.set_rotation(cfg.view.rotation);
        scene.view.set_scale(s);
        scene.view.set_shift(cfg.view.shift);
        scene.update();
        scene.events.clear();
        Ok(scene)
    }

    /// Snapshot the session as a configuration
    pub fn to_config(&self) -> SceneConfig {
        SceneConfig {
            shape: self.shape,
            material: self.mesh.material,
            light: self.light.clone(),
            view: ViewConfig {
                scale: self.view.scale().diagonal(),
                rotation: *self.view.rotation(),
                shift: self.view.shift().translation_part(),
                preset: self.view.preset(),
            },
            render: self.settings.clone(),
            width: self.width,
            height: self.height,
            seed: self.seed,
        }
    }

    /// Re-run transforms and lighting over the current mesh
    fn update(&mut self) {
        self.mesh.apply_transform(self.view.world(), self.view.normal());
        illuminate(&mut self.mesh, &self.light);
    }

    fn view_changed(&mut self) {
        self.update();
        self.events.push(SceneEvent::WorldChanged(*self.view.world()));
    }

    // Accessors

    pub fn shape(&self) -> &ShapeKind {
        &self.shape
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn settings(&self) -> &RasterSettings {
        &self.settings
    }

    /// Render toggles; they only affect drawing, so no recompute is needed
    pub fn settings_mut(&mut self) -> &mut RasterSettings {
        &mut self.settings
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn world_matrix(&self) -> &Mat4 {
        self.view.world()
    }

    pub fn normal_matrix(&self) -> &Mat4 {
        self.view.normal()
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    // Shape and material

    /// Replace the mesh with a freshly generated one
    pub fn set_shape(&mut self, shape: ShapeKind) -> Result<(), MeshError> {
        let material = self.mesh.material;
        self.mesh = generate(&shape, material, &mut self.rng)?;
        self.shape = shape;
        self.update();
        Ok(())
    }

    /// Rebuild the current shape with new random face colors
    pub fn regenerate(&mut self) -> Result<(), MeshError> {
        self.set_shape(self.shape)
    }

    pub fn set_material(&mut self, material: Material) -> bool {
        if material == self.mesh.material {
            return false;
        }
        self.mesh.material = material;
        self.update();
        true
    }

    // View

    pub fn set_scale(&mut self, s: Vec3) -> bool {
        if !self.view.set_scale(s) {
            return false;
        }
        self.events.push(SceneEvent::ScaleChanged(*self.view.scale()));
        self.view_changed();
        true
    }

    /// Mouse-wheel zoom: add `delta` to every scale axis
    pub fn zoom(&mut self, delta: f32) -> bool {
        let d = self.view.scale().diagonal();
        self.set_scale(Vec3::new(d.x + delta, d.y + delta, d.z + delta))
    }

    pub fn set_rotation(&mut self, rotation: Mat4) -> bool {
        if !self.view.set_rotation(rotation) {
            return false;
        }
        self.events.push(SceneEvent::RotationChanged(*self.view.rotation()));
        self.view_changed();
        true
    }

    fn rotate(&mut self, axis: Axis, degrees: f32) -> bool {
        if !self.view.rotate(axis, degrees) {
            return false;
        }
        self.events.push(SceneEvent::RotationChanged(*self.view.rotation()));
        self.view_changed();
        true
    }

    pub fn rotate_x(&mut self, degrees: f32) -> bool {
        self.rotate(Axis::X, degrees)
    }

    pub fn rotate_y(&mut self, degrees: f32) -> bool {
        self.rotate(Axis::Y, degrees)
    }

    pub fn rotate_z(&mut self, degrees: f32) -> bool {
        self.rotate(Axis::Z, degrees)
    }

    pub fn set_shift(&mut self, t: Vec3) -> bool {
        if !self.view.set_shift(t) {
            return false;
        }
        self.events.push(SceneEvent::ShiftChanged(*self.view.shift()));
        self.view_changed();
        true
    }

    pub fn translate(&mut self, d: Vec3) -> bool {
        if !self.view.translate_by(d) {
            return false;
        }
        self.events.push(SceneEvent::ShiftChanged(*self.view.shift()));
        self.view_changed();
        true
    }

    pub fn set_preset(&mut self, preset: ViewPreset) {
        let before = *self.view.rotation();
        self.view.set_preset(preset);
        if *self.view.rotation() != before {
            self.events.push(SceneEvent::RotationChanged(*self.view.rotation()));
        }
        self.view_changed();
    }

    pub fn isometric(&mut self) {
        self.view.isometric();
        self.events.push(SceneEvent::RotationChanged(*self.view.rotation()));
        self.view_changed();
    }

    /// Track a canvas resize. The view is rescaled by the width ratio so
    /// the mesh keeps its proportion of the window.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return false;
        }
        let ratio = width as f32 / self.width as f32;
        self.width = width;
        self.height = height;
        if self.view.rescale(ratio) {
            self.events.push(SceneEvent::ScaleChanged(*self.view.scale()));
            self.events.push(SceneEvent::ShiftChanged(*self.view.shift()));
            self.view_changed();
        }
        debug!("canvas resized to {}x{}", width, height);
        true
    }

    // Light

    pub fn set_light_distance(&mut self, distance: f32) -> bool {
        if !self.light.set_distance(distance) {
            return false;
        }
        self.events.push(SceneEvent::LightDistanceChanged(distance));
        self.update();
        true
    }

    pub fn rotate_light_x(&mut self, degrees: f32) {
        self.light.rotate(Axis::X, degrees);
        self.update();
    }

    pub fn rotate_light_y(&mut self, degrees: f32) {
        self.light.rotate(Axis::Y, degrees);
        self.update();
    }

    pub fn rotate_light_z(&mut self, degrees: f32) {
        self.light.rotate(Axis::Z, degrees);
        self.update();
    }

    pub fn set_light_colors(&mut self, ambient: Rgb, intensity: Rgb) -> bool {
        if ambient == self.light.ambient && intensity == self.light.intensity {
            return false;
        }
        self.light.ambient = ambient;
        self.light.intensity = intensity;
        self.update();
        true
    }

    pub fn set_attenuation(&mut self, linear: f32, constant: f32) -> bool {
        if !self.light.set_attenuation(linear, constant) {
            return false;
        }
        self.update();
        true
    }

    // Rendering

    /// Polygons that would be drawn this frame, in draw order
    pub fn visible_polygons(&self) -> Vec<usize> {
        visible_polygons(&self.mesh, &self.settings)
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            mesh: &self.mesh,
            rotation: *self.view.rotation(),
            origin: self.view.world().transform_point(Vec3::ZERO),
            light_pos: self.light.world_position(),
            light_ambient: self.light.ambient,
            light_intensity: self.light.intensity,
            settings: &self.settings,
        }
    }

    pub fn render(&self, backend: &dyn RenderBackend, fb: &mut Framebuffer) -> FrameStats {
        fb.resize(self.width, self.height);
        backend.draw(&self.frame(), fb)
    }

    /// Render with the software backend into a new framebuffer
    pub fn render_frame(&self) -> Framebuffer {
        let mut fb = Framebuffer::new(self.width, self.height);
        let stats = self.render(&SoftwareBackend, &mut fb);
        info!("rendered {}x{}: {} polygons drawn", self.width, self.height, stats.drawn);
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    fn cube_scene(triangulated: bool) -> Scene {
        Scene::new(ShapeKind::Cube { half_edge: 50.0, triangulated }, 1).unwrap()
    }

    #[test]
    fn test_top_view_shows_only_top_face() {
        let mut scene = cube_scene(false);
        scene.set_preset(ViewPreset::Top);
        let visible = scene.visible_polygons();
        assert_eq!(visible.len(), 1);
        let poly = &scene.mesh().polygons[visible[0]];
        for &vi in &poly.vertices {
            assert_eq!(scene.mesh().vertices[vi].local.y, -50.0);
        }
    }

    #[test]
    fn test_top_view_triangulated_cube() {
        let mut scene = cube_scene(true);
        scene.set_preset(ViewPreset::Top);
        let visible = scene.visible_polygons();
        assert_eq!(visible.len(), 2);
        for &pi in &visible {
            for &vi in &scene.mesh().polygons[pi].vertices {
                assert_eq!(scene.mesh().vertices[vi].local.y, -50.0);
            }
        }
    }

    #[test]
    fn test_cull_passes_at_most_half() {
        let mut scene = cube_scene(false);
        for (x, y) in [(0.0, 0.0), (30.0, 0.0), (17.0, 41.0), (-60.0, 125.0)] {
            scene.rotate_x(x);
            scene.rotate_y(y);
            assert!(scene.visible_polygons().len() <= 3);
        }
        let mut tri = cube_scene(true);
        tri.rotate_x(25.0);
        tri.rotate_y(-40.0);
        assert!(tri.visible_polygons().len() * 2 <= tri.mesh().polygon_count());
    }

    #[test]
    fn test_negative_scale_no_event() {
        let mut scene = cube_scene(false);
        scene.drain_events();
        let world = *scene.world_matrix();
        assert!(!scene.set_scale(Vec3::new(-1.0, 1.0, 1.0)));
        assert!(scene.drain_events().is_empty());
        assert_eq!(*scene.world_matrix(), world);
    }

    #[test]
    fn test_rotation_emits_events() {
        let mut scene = cube_scene(false);
        scene.drain_events();
        assert!(scene.rotate_y(15.0));
        let events = scene.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SceneEvent::RotationChanged(_)));
        assert_eq!(events[1], SceneEvent::WorldChanged(*scene.world_matrix()));
    }

    #[test]
    fn test_light_distance_events() {
        let mut scene = cube_scene(false);
        scene.drain_events();
        assert!(!scene.set_light_distance(0.0));
        assert!(scene.drain_events().is_empty());
        assert!(scene.set_light_distance(500.0));
        assert_eq!(scene.drain_events(), vec![SceneEvent::LightDistanceChanged(500.0)]);
    }

    #[test]
    fn test_resize_rescales_view() {
        let mut scene = cube_scene(false);
        let (w, h) = scene.size();
        assert!(scene.resize(w * 2, h * 2));
        assert_eq!(scene.view().scale().diagonal(), Vec3::new(2.0, 2.0, 2.0));
        assert!(!scene.resize(w * 2, h * 2));
    }

    #[test]
    fn test_shape_change_replaces_mesh() {
        let mut scene = cube_scene(false);
        scene.set_shape(ShapeKind::default_pyramid()).unwrap();
        assert_eq!(scene.mesh().vertex_count(), 5);
        let bad = ShapeKind::Pyramid { half_base: -1.0, height: 10.0 };
        assert!(scene.set_shape(bad).is_err());
        assert_eq!(*scene.shape(), ShapeKind::default_pyramid());
    }

    #[test]
    fn test_render_frame_draws_mesh() {
        let mut scene = cube_scene(false);
        scene.settings_mut().show_light = false;
        scene.settings_mut().show_axes = false;
        let (w, h) = scene.size();
        let fb = scene.render_frame();
        assert_eq!((fb.width, fb.height), (w, h));
        // Front face covers the center
        assert_ne!(fb.get_pixel(w / 2, h / 2), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(2, 2), Some(Color::BLACK));
    }
}
