//! Frame drawing: cull, depth order, fill, overlays
//!
//! A `RenderBackend` turns one prepared frame (mesh already transformed and
//! lit) into pixels. `SoftwareBackend` is the only implementation; a GPU
//! backend would take the same `Frame` and hand fill and shading to the driver.

use log::debug;
use crate::mesh::Mesh;
use super::math::{Mat4, Vec3};
use super::render::{fill_polygon_flat, fill_polygon_gouraud, Framebuffer, ScreenVertex};
use super::types::{Color, FaceFill, RasterSettings, Rgb, ShadingMode};

/// Screen-space center of the axes gizmo
pub const GIZMO_ORIGIN: (i32, i32) = (60, 60);
pub const GIZMO_RADIUS: i32 = 55;
pub const GIZMO_AXIS_LENGTH: f32 = 50.0;

pub const LIGHT_AMBIENT_RADIUS: i32 = 20;
pub const LIGHT_INTENSITY_RADIUS: i32 = 10;

/// Radius of the dot at the tip of a normal glyph
const GLYPH_DOT_RADIUS: i32 = 2;

/// Everything a backend needs to draw one frame
pub struct Frame<'a> {
    pub mesh: &'a Mesh,
    /// View rotation, for the axes gizmo
    pub rotation: Mat4,
    /// World position of the mesh's local origin
    pub origin: Vec3,
    pub light_pos: Vec3,
    pub light_ambient: Rgb,
    pub light_intensity: Rgb,
    pub settings: &'a RasterSettings,
}

/// Per-frame polygon counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub culled: usize,
}

/// A way of turning a `Frame` into pixels
pub trait RenderBackend {
    fn name(&self) -> &str;
    fn draw(&self, frame: &Frame, fb: &mut Framebuffer) -> FrameStats;
}

/// Scan-line software renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareBackend;

/// Indices of the polygons to draw, in draw order.
///
/// With culling on, polygons whose world normal points away from the
/// viewer (z >= 0) are dropped. With depth sort on, the rest are ordered
/// back to front by centroid z, ties broken by normal z, both descending.
pub fn visible_polygons(mesh: &Mesh, settings: &RasterSettings) -> Vec<usize> {
    let mut keyed: Vec<(usize, f32, f32)> = mesh
        .polygons
        .iter()
        .enumerate()
        .filter(|(_, p)| !settings.backface_cull || p.normal_world.z < 0.0)
        .map(|(i, p)| (i, mesh.midpoint(i).z, p.normal_world.z))
        .collect();

    if settings.depth_sort {
        keyed.sort_by(|a, b| b.1.total_cmp(&a.1).then(b.2.total_cmp(&a.2)));
    }

    keyed.into_iter().map(|(i, _, _)| i).collect()
}

impl SoftwareBackend {
    fn screen_point(p: Vec3, center: (f32, f32)) -> (i32, i32) {
        ((p.x + center.0).round() as i32, (p.y + center.1).round() as i32)
    }

    fn draw_glyph(fb: &mut Framebuffer, from: Vec3, dir: Vec3, center: (f32, f32), color: Color) {
        let (x0, y0) = Self::screen_point(from, center);
        let (x1, y1) = Self::screen_point(from + dir, center);
        fb.draw_line(x0, y0, x1, y1, color);
        fb.draw_circle(x1, y1, GLYPH_DOT_RADIUS, color);
    }

    fn draw_axes(fb: &mut Framebuffer, rotation: &Mat4) {
        let (ox, oy) = GIZMO_ORIGIN;
        fb.draw_circle_outline(ox, oy, GIZMO_RADIUS, Color::GRAY);
        let axes = [
            (Vec3::new(1.0, 0.0, 0.0), Color::RED),
            (Vec3::new(0.0, 1.0, 0.0), Color::GREEN),
            (Vec3::new(0.0, 0.0, 1.0), Color::BLUE),
        ];
        for (axis, color) in axes {
            let d = rotation.transform_vector(axis) * GIZMO_AXIS_LENGTH;
            fb.draw_line(ox, oy, ox + d.x.round() as i32, oy + d.y.round() as i32, color);
        }
    }

    fn draw_light(fb: &mut Framebuffer, frame: &Frame, center: (f32, f32)) {
        let (x, y) = Self::screen_point(frame.light_pos, center);
        fb.draw_circle(x, y, LIGHT_AMBIENT_RADIUS, frame.light_ambient.to_color());
        fb.draw_circle(x, y, LIGHT_INTENSITY_RADIUS, frame.light_intensity.to_color());
    }

    fn draw_mesh(fb: &mut Framebuffer, frame: &Frame, center: (f32, f32)) -> FrameStats {
        let mesh = frame.mesh;
        let settings = frame.settings;
        let order = visible_polygons(mesh, settings);
        // Vertex glyphs are hidden on back faces whenever ordering is in play
        let hide_back_vertices = settings.backface_cull || settings.depth_sort;

        let mut screen: Vec<ScreenVertex> = Vec::with_capacity(4);
        for &pi in &order {
            let poly = &mesh.polygons[pi];
            let base = match settings.fill {
                FaceFill::Neutral => Some(Rgb::WHITE),
                FaceFill::Random => Some(poly.color),
                FaceFill::None => None,
            };

            screen.clear();
            screen.extend(poly.vertices.iter().map(|&vi| {
                let v = &mesh.vertices[vi];
                let light = base.map_or(Rgb::BLACK, |b| b * v.light.clamped());
                ScreenVertex::new(v.world.x + center.0, v.world.y + center.1, light)
            }));

            if let Some(base) = base {
                match settings.shading {
                    ShadingMode::Gouraud => fill_polygon_gouraud(fb, &screen),
                    ShadingMode::Flat => {
                        let color = (base * mesh.mid_light(pi).clamped()).to_color();
                        fill_polygon_flat(fb, &screen, color);
                    }
                }
            }

            if settings.wireframe {
                let outline: Vec<(i32, i32)> = screen
                    .iter()
                    .map(|s| (s.x.round() as i32, s.y.round() as i32))
                    .collect();
                fb.draw_polyline(&outline, settings.wire_color);
            }

            if settings.polygon_normals {
                Self::draw_glyph(fb, mesh.midpoint(pi), poly.normal_world, center, Color::DARK_RED);
            }
        }

        if settings.vertex_normals {
            for v in &mesh.vertices {
                let faces_viewer = v
                    .polygons
                    .iter()
                    .any(|&pi| mesh.polygons[pi].normal_world.z <= 0.0);
                if hide_back_vertices && !faces_viewer {
                    continue;
                }
                Self::draw_glyph(fb, v.world, v.normal_world, center, Color::DARK_GREEN);
            }
        }

        FrameStats {
            drawn: order.len(),
            culled: mesh.polygons.len() - order.len(),
        }
    }
}

impl RenderBackend for SoftwareBackend {
    fn name(&self) -> &str {
        "software"
    }

    fn draw(&self, frame: &Frame, fb: &mut Framebuffer) -> FrameStats {
        let settings = frame.settings;
        fb.clear(settings.background);

        if settings.show_axes {
            Self::draw_axes(fb, &frame.rotation);
        }

        let center = (fb.width as f32 / 2.0, fb.height as f32 / 2.0);

        // Farther of mesh and light goes down first
        let stats = if !settings.show_light {
            Self::draw_mesh(fb, frame, center)
        } else if frame.origin.z > frame.light_pos.z {
            let stats = Self::draw_mesh(fb, frame, center);
            Self::draw_light(fb, frame, center);
            stats
        } else {
            Self::draw_light(fb, frame, center);
            Self::draw_mesh(fb, frame, center)
        };

        debug!("{} frame: {} polygons drawn, {} culled", self.name(), stats.drawn, stats.culled);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Material, Mesh};

    /// Three parallel facing squares at the given depths
    fn layered_mesh(depths: &[f32]) -> Mesh {
        let mut mesh = Mesh::new(Material::default());
        for &z in depths {
            let a = mesh.add_vertex(Vec3::new(-1.0, -1.0, z));
            let b = mesh.add_vertex(Vec3::new(1.0, -1.0, z));
            let c = mesh.add_vertex(Vec3::new(1.0, 1.0, z));
            mesh.add_polygon(&[a, c, b], Rgb::WHITE).unwrap();
        }
        mesh.apply_transform(&Mat4::IDENTITY, &Mat4::IDENTITY.normal_matrix());
        mesh
    }

    #[test]
    fn test_depth_sort_back_to_front() {
        let mesh = layered_mesh(&[5.0, 1.0, 3.0]);
        let settings = RasterSettings { depth_sort: true, ..Default::default() };
        let order = visible_polygons(&mesh, &settings);
        let depths: Vec<f32> = order.iter().map(|&i| mesh.midpoint(i).z).collect();
        assert_eq!(depths, vec![5.0, 3.0, 1.0]);
    }

    #[test]
    fn test_unsorted_keeps_mesh_order() {
        let mesh = layered_mesh(&[5.0, 1.0, 3.0]);
        let settings = RasterSettings { depth_sort: false, ..Default::default() };
        assert_eq!(visible_polygons(&mesh, &settings), vec![0, 1, 2]);
    }

    #[test]
    fn test_cull_drops_back_facing() {
        let mut mesh = Mesh::new(Material::default());
        let a = mesh.add_vertex(Vec3::new(-1.0, -1.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, -1.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(1.0, 1.0, 0.0));
        mesh.add_polygon(&[a, c, b], Rgb::WHITE).unwrap(); // normal -z, toward viewer
        mesh.add_polygon(&[a, b, c], Rgb::WHITE).unwrap(); // normal +z
        mesh.apply_transform(&Mat4::IDENTITY, &Mat4::IDENTITY.normal_matrix());

        let culled = visible_polygons(&mesh, &RasterSettings::default());
        assert_eq!(culled, vec![0]);
        let all = RasterSettings { backface_cull: false, ..Default::default() };
        assert_eq!(visible_polygons(&mesh, &all).len(), 2);
    }

    #[test]
    fn test_draw_reports_stats_and_fills() {
        let mut mesh = layered_mesh(&[0.0]);
        for v in &mut mesh.vertices {
            v.light = Rgb::WHITE;
        }
        let settings = RasterSettings { show_axes: false, show_light: false, ..Default::default() };
        let frame = Frame {
            mesh: &mesh,
            rotation: Mat4::IDENTITY,
            origin: Vec3::ZERO,
            light_pos: Vec3::new(0.0, 0.0, -100.0),
            light_ambient: Rgb::splat(0.2),
            light_intensity: Rgb::WHITE,
            settings: &settings,
        };
        let mut fb = Framebuffer::new(20, 20);
        let stats = SoftwareBackend.draw(&frame, &mut fb);
        assert_eq!(stats, FrameStats { drawn: 1, culled: 0 });
        // Triangle (9,9) (11,11) (11,9) around center (10,10)
        assert_eq!(fb.get_pixel(11, 10), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(2, 2), Some(Color::BLACK));
    }

    /// One triangle spanning (-8,-8)..(8,8), facing the viewer unless `back`
    fn big_triangle(back: bool, light: Rgb) -> Mesh {
        let mut mesh = Mesh::new(Material::default());
        let a = mesh.add_vertex(Vec3::new(-8.0, -8.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(8.0, -8.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(8.0, 8.0, 0.0));
        let order = if back { [a, b, c] } else { [a, c, b] };
        mesh.add_polygon(&order, Rgb::splat(0.4)).unwrap();
        mesh.apply_transform(&Mat4::IDENTITY, &Mat4::IDENTITY.normal_matrix());
        for v in &mut mesh.vertices {
            v.light = light;
        }
        mesh
    }

    fn draw_alone(mesh: &Mesh, settings: RasterSettings) -> Framebuffer {
        let settings = RasterSettings { show_axes: false, show_light: false, ..settings };
        let frame = Frame {
            mesh,
            rotation: Mat4::IDENTITY,
            origin: Vec3::ZERO,
            light_pos: Vec3::new(0.0, 0.0, -100.0),
            light_ambient: Rgb::splat(0.2),
            light_intensity: Rgb::WHITE,
            settings: &settings,
        };
        let mut fb = Framebuffer::new(40, 40);
        SoftwareBackend.draw(&frame, &mut fb);
        fb
    }

    #[test]
    fn test_flat_clamps_light_before_base_color() {
        let mesh = big_triangle(false, Rgb::new(2.0, 0.5, 0.0));
        let settings = RasterSettings {
            shading: ShadingMode::Flat,
            fill: FaceFill::Random,
            ..Default::default()
        };
        let fb = draw_alone(&mesh, settings);
        // Screen triangle (12,12) (28,12) (28,28)
        assert_eq!(fb.get_pixel(25, 15), Some(Color::new(102, 51, 0)));
        assert_eq!(fb.get_pixel(13, 12), Some(Color::new(102, 51, 0)));
    }

    #[test]
    fn test_fill_sources() {
        let mesh = big_triangle(false, Rgb::WHITE);
        let neutral = draw_alone(&mesh, RasterSettings::default());
        assert_eq!(neutral.get_pixel(25, 15), Some(Color::WHITE));

        let random = draw_alone(&mesh, RasterSettings { fill: FaceFill::Random, ..Default::default() });
        assert_eq!(random.get_pixel(25, 15), Some(Color::new(102, 102, 102)));
    }

    #[test]
    fn test_no_fill_keeps_wireframe() {
        let mesh = big_triangle(false, Rgb::WHITE);
        let settings = RasterSettings {
            fill: FaceFill::None,
            wireframe: true,
            wire_color: Color::GREEN,
            ..Default::default()
        };
        let fb = draw_alone(&mesh, settings);
        assert_eq!(fb.get_pixel(25, 15), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(20, 12), Some(Color::GREEN));
        assert_eq!(fb.get_pixel(28, 20), Some(Color::GREEN));
    }

    #[test]
    fn test_polygon_glyph_follows_cull_only() {
        let mesh = big_triangle(true, Rgb::WHITE);
        let base = RasterSettings {
            fill: FaceFill::None,
            polygon_normals: true,
            ..Default::default()
        };
        // Centroid (8/3, -8/3) lands on pixel (23, 17)
        let sorted = draw_alone(&mesh, RasterSettings { backface_cull: false, depth_sort: true, ..base.clone() });
        assert_eq!(sorted.get_pixel(23, 17), Some(Color::DARK_RED));

        let culled = draw_alone(&mesh, base);
        assert_eq!(culled.get_pixel(23, 17), Some(Color::BLACK));
    }

    #[test]
    fn test_near_light_drawn_over_mesh() {
        let mut mesh = layered_mesh(&[0.0]);
        for v in &mut mesh.vertices {
            v.light = Rgb::WHITE;
        }
        let settings = RasterSettings { show_axes: false, ..Default::default() };
        let frame = Frame {
            mesh: &mesh,
            rotation: Mat4::IDENTITY,
            origin: Vec3::ZERO,
            light_pos: Vec3::new(0.0, 0.0, -100.0),
            light_ambient: Rgb::new(1.0, 0.0, 0.0),
            light_intensity: Rgb::new(0.0, 0.0, 1.0),
            settings: &settings,
        };
        let mut fb = Framebuffer::new(40, 40);
        SoftwareBackend.draw(&frame, &mut fb);
        assert_eq!(fb.get_pixel(20, 20), Some(Color::BLUE));
    }
}
