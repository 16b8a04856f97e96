//! CLI command implementations.

use std::path::Path;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use polyshade::curve::{plot_curve, Ellipse, Transform2D};
use polyshade::rasterizer::{Color, Framebuffer, SoftwareBackend, HEIGHT, WIDTH};
use polyshade::scene::{config_to_string, load_config, save_config, Scene, SceneConfig};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn load_scene(path: Option<&Path>) -> Result<Scene, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => load_config(p)?,
        None => SceneConfig::default(),
    };
    Ok(Scene::from_config(&config)?)
}

/// Open the interactive viewer window.
pub fn view(scene_path: Option<&Path>) -> CommandResult {
    let scene = load_scene(scene_path)?;
    macroquad::Window::from_config(crate::viewer::window_conf(&scene), crate::viewer::run(scene));
    Ok(())
}

/// Render one frame to a PNG.
pub fn render(scene_path: Option<&Path>, output: &Path) -> CommandResult {
    let scene = load_scene(scene_path)?;
    let fb = scene.render_frame();
    fb.save_png(output)?;
    info!("wrote {}", output.display());
    Ok(())
}

/// Render a rotating sequence of frames.
pub fn turntable(scene_path: Option<&Path>, frames: usize, step: f32, output_dir: &Path) -> CommandResult {
    let mut scene = load_scene(scene_path)?;
    std::fs::create_dir_all(output_dir)?;

    let (w, h) = scene.size();
    let mut fb = Framebuffer::new(w, h);
    let bar = ProgressBar::new(frames as u64);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} frames ({eta})")?);

    for i in 0..frames {
        scene.render(&SoftwareBackend, &mut fb);
        fb.save_png(&output_dir.join(format!("frame_{:04}.png", i)))?;
        scene.rotate_y(step);
        scene.drain_events();
        bar.inc(1);
    }
    bar.finish();
    info!("wrote {} frames to {}", frames, output_dir.display());
    Ok(())
}

/// Plot an ellipse with its axes.
pub fn curve(n: usize, a: f32, b: f32, rotation: f32, output: &Path) -> CommandResult {
    let ellipse = Ellipse::new(n, a, b);
    let mut transform = Transform2D::default();
    transform.set_rotation(rotation);

    let mut fb = Framebuffer::new(WIDTH, HEIGHT);
    fb.clear(Color::BLACK);
    plot_curve(&mut fb, &ellipse, &transform, Color::WHITE);
    fb.save_png(output)?;
    info!("wrote {} ({} samples)", output.display(), ellipse.n());
    Ok(())
}

/// Write the default scene configuration.
pub fn dump_config(output: Option<&Path>) -> CommandResult {
    let config = SceneConfig::default();
    match output {
        Some(path) => save_config(&config, path)?,
        None => println!("{}", config_to_string(&config)?),
    }
    Ok(())
}
