//! Interactive viewer
//!
//! Renders the scene into the software framebuffer every frame and blits it
//! as a texture. Input only calls `Scene` setters.

use log::debug;
use macroquad::prelude::*;
use polyshade::mesh::{ConeParams, ShapeKind};
use polyshade::rasterizer::{FaceFill, Framebuffer, ShadingMode, SoftwareBackend, Vec3 as SceneVec3};
use polyshade::scene::{Scene, ViewPreset};
use polyshade::VERSION;

const ZOOM_PER_WHEEL_STEP: f32 = 0.05;
const LIGHT_DISTANCE_STEP: f32 = 20.0;

pub fn window_conf(scene: &Scene) -> Conf {
    let (w, h) = scene.size();
    Conf {
        window_title: format!("polyshade v{}", VERSION),
        window_width: w as i32,
        window_height: h as i32,
        window_resizable: true,
        ..Default::default()
    }
}

fn next_shape(shape: &ShapeKind) -> ShapeKind {
    match shape {
        ShapeKind::Cube { .. } => ShapeKind::default_pyramid(),
        ShapeKind::Pyramid { .. } => ShapeKind::Cone(ConeParams::default()),
        ShapeKind::Cone(_) => ShapeKind::default_cube(),
    }
}

/// Signed angle in degrees swept from `a` to `b` around the origin
fn swept_angle(a: (f32, f32), b: (f32, f32)) -> f32 {
    let cross = a.0 * b.1 - a.1 * b.0;
    let dot = a.0 * b.0 + a.1 * b.1;
    cross.atan2(dot).to_degrees()
}

fn handle_drag(scene: &mut Scene, prev: (f32, f32), cur: (f32, f32)) {
    let dx = cur.0 - prev.0;
    let dy = cur.1 - prev.1;
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
    let alt = is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt);
    let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);

    if ctrl {
        let (w, h) = scene.size();
        let c = (w as f32 / 2.0, h as f32 / 2.0);
        let angle = swept_angle((prev.0 - c.0, prev.1 - c.1), (cur.0 - c.0, cur.1 - c.1));
        if alt {
            scene.rotate_light_z(angle);
        } else {
            scene.rotate_z(angle);
        }
    } else if shift {
        scene.translate(SceneVec3::new(dx, dy, 0.0));
    } else if alt {
        scene.rotate_light_x(-dy);
        scene.rotate_light_y(dx);
    } else {
        scene.rotate_x(-dy);
        scene.rotate_y(dx);
    }
}

fn handle_keys(scene: &mut Scene) {
    if is_key_pressed(KeyCode::Key1) {
        scene.set_preset(ViewPreset::Orbit);
    }
    if is_key_pressed(KeyCode::Key2) {
        scene.set_preset(ViewPreset::Front);
    }
    if is_key_pressed(KeyCode::Key3) {
        scene.set_preset(ViewPreset::Side);
    }
    if is_key_pressed(KeyCode::Key4) {
        scene.set_preset(ViewPreset::Top);
    }
    if is_key_pressed(KeyCode::I) {
        scene.isometric();
    }

    if is_key_pressed(KeyCode::Tab) {
        let shape = next_shape(scene.shape());
        if let Err(e) = scene.set_shape(shape) {
            println!("Failed to build {}: {}", shape.name(), e);
        }
    }
    if is_key_pressed(KeyCode::R) {
        if let Err(e) = scene.regenerate() {
            println!("Failed to regenerate mesh: {}", e);
        }
    }

    if is_key_pressed(KeyCode::Up) {
        let d = scene.light().distance + LIGHT_DISTANCE_STEP;
        scene.set_light_distance(d);
    }
    if is_key_pressed(KeyCode::Down) {
        let d = scene.light().distance - LIGHT_DISTANCE_STEP;
        scene.set_light_distance(d);
    }

    let settings = scene.settings_mut();
    if is_key_pressed(KeyCode::W) {
        settings.wireframe = !settings.wireframe;
    }
    if is_key_pressed(KeyCode::N) {
        settings.polygon_normals = !settings.polygon_normals;
    }
    if is_key_pressed(KeyCode::V) {
        settings.vertex_normals = !settings.vertex_normals;
    }
    if is_key_pressed(KeyCode::C) {
        settings.backface_cull = !settings.backface_cull;
    }
    if is_key_pressed(KeyCode::S) {
        settings.depth_sort = !settings.depth_sort;
    }
    if is_key_pressed(KeyCode::A) {
        settings.show_axes = !settings.show_axes;
    }
    if is_key_pressed(KeyCode::L) {
        settings.show_light = !settings.show_light;
    }
    if is_key_pressed(KeyCode::G) {
        settings.shading = match settings.shading {
            ShadingMode::Flat => ShadingMode::Gouraud,
            ShadingMode::Gouraud => ShadingMode::Flat,
        };
    }
    if is_key_pressed(KeyCode::F) {
        settings.fill = match settings.fill {
            FaceFill::Neutral => FaceFill::Random,
            FaceFill::Random => FaceFill::None,
            FaceFill::None => FaceFill::Neutral,
        };
    }
}

/// Viewer main loop
pub async fn run(mut scene: Scene) {
    let (w, h) = scene.size();
    let mut fb = Framebuffer::new(w, h);
    let mut last_mouse = mouse_position();

    println!("=== polyshade v{} ===", VERSION);

    loop {
        let sw = screen_width().max(1.0) as usize;
        let sh = screen_height().max(1.0) as usize;
        scene.resize(sw, sh);

        let mouse = mouse_position();
        if is_mouse_button_down(MouseButton::Left) {
            handle_drag(&mut scene, last_mouse, mouse);
        }
        last_mouse = mouse;

        let wheel = mouse_wheel().1;
        if wheel != 0.0 {
            scene.zoom(wheel.signum() * ZOOM_PER_WHEEL_STEP);
        }

        handle_keys(&mut scene);

        for event in scene.drain_events() {
            debug!("{:?}", event);
        }

        scene.render(&SoftwareBackend, &mut fb);

        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        let s = scene.settings();
        let hud = format!(
            "{} | {:?} {:?} | cull {} sort {} | light {:.0}",
            scene.shape().name(),
            s.shading,
            s.fill,
            s.backface_cull,
            s.depth_sort,
            scene.light().distance,
        );
        draw_text(&hud, 10.0, screen_height() - 10.0, 18.0, WHITE);

        next_frame().await;
    }
}
