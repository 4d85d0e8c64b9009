//! Painter's algorithm: project faces, sort far-to-near, fill and stroke.
//! There is no depth buffer. Faces are small convex quads from rigid
//! boxes, so the mean vertex depth is a good enough sort key.

use super::math::{clip_segment_near, horizon_y, project, project_world, world_to_camera};
use super::render::Surface;
use super::types::{Backdrop, CameraPose, Drawable, ProjectionSettings, WorldFace, WorldLine};

/// Outline width for face strokes, in pixels
pub const STROKE_WIDTH: f32 = 1.0;

/// Per-frame counters, mostly for the debug overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub faces_submitted: usize,
    pub faces_drawn: usize,
    pub lines_drawn: usize,
}

/// Project a face. Any vertex behind the near plane discards the whole face.
pub fn project_face(
    face: &WorldFace,
    camera: &CameraPose,
    settings: &ProjectionSettings,
    width: f32,
    height: f32,
) -> Option<Drawable> {
    if face.points.len() < 3 {
        return None;
    }

    let points = face
        .points
        .iter()
        .map(|&p| project_world(p, camera, settings, width, height))
        .collect::<Option<Vec<_>>>()?;

    let depth = points.iter().map(|p| p.z).sum::<f32>() / points.len() as f32;

    Some(Drawable {
        points,
        fill: face.fill,
        stroke: face.stroke,
        depth,
    })
}

/// Stable sort, farthest first
pub fn sort_back_to_front(drawables: &mut [Drawable]) {
    drawables.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}

/// Project every face, drop the invisible ones and order the rest for painting
pub fn build_drawables(
    faces: &[WorldFace],
    camera: &CameraPose,
    settings: &ProjectionSettings,
    width: f32,
    height: f32,
) -> Vec<Drawable> {
    let mut drawables: Vec<Drawable> = faces
        .iter()
        .filter_map(|face| project_face(face, camera, settings, width, height))
        .collect();
    sort_back_to_front(&mut drawables);
    drawables
}

/// Paint in slice order: fill, then outline
pub fn paint_drawables<S: Surface + ?Sized>(surface: &mut S, drawables: &[Drawable]) {
    let mut outline: Vec<(f32, f32)> = Vec::with_capacity(4);
    for d in drawables {
        outline.clear();
        outline.extend(d.points.iter().map(|p| (p.x, p.y)));
        surface.fill_polygon(&outline, d.fill);
        surface.stroke_polygon(&outline, STROKE_WIDTH, d.stroke);
    }
}

/// Draw ground lines, cutting them at the near plane. Returns how many were drawn.
pub fn paint_lines<S: Surface + ?Sized>(
    surface: &mut S,
    lines: &[WorldLine],
    camera: &CameraPose,
    settings: &ProjectionSettings,
) -> usize {
    let (w, h) = (surface.width(), surface.height());
    let mut drawn = 0;

    for line in lines {
        let a = world_to_camera(line.a, camera);
        let b = world_to_camera(line.b, camera);
        let Some((a, b)) = clip_segment_near(a, b, settings.near_plane) else {
            continue;
        };
        if let (Some(pa), Some(pb)) = (project(a, settings, w, h), project(b, settings, w, h)) {
            surface.draw_line((pa.x, pa.y), (pb.x, pb.y), line.thickness, line.color);
            drawn += 1;
        }
    }

    drawn
}

/// Sky above the horizon, ground below, both as vertical gradients
pub fn paint_backdrop<S: Surface + ?Sized>(
    surface: &mut S,
    camera: &CameraPose,
    settings: &ProjectionSettings,
    backdrop: &Backdrop,
) {
    let (w, h) = (surface.width(), surface.height());
    let horizon = horizon_y(camera.pitch, settings, h);

    surface.fill_vertical_gradient(0.0, 0.0, w, horizon, backdrop.sky_top, backdrop.sky_horizon);
    surface.fill_vertical_gradient(0.0, horizon, w, h - horizon, backdrop.ground_horizon, backdrop.ground_near);
}

/// Full frame: backdrop, grid, then depth-sorted faces
pub fn render_scene<S: Surface + ?Sized>(
    surface: &mut S,
    faces: &[WorldFace],
    lines: &[WorldLine],
    camera: &CameraPose,
    settings: &ProjectionSettings,
    backdrop: &Backdrop,
) -> RenderStats {
    paint_backdrop(surface, camera, settings, backdrop);
    let lines_drawn = paint_lines(surface, lines, camera, settings);

    let drawables = build_drawables(faces, camera, settings, surface.width(), surface.height());
    paint_drawables(surface, &drawables);

    RenderStats {
        faces_submitted: faces.len(),
        faces_drawn: drawables.len(),
        lines_drawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Color, Framebuffer, Vec3};

    fn quad_at(z: f32, fill: Color) -> WorldFace {
        WorldFace {
            points: vec![
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, -1.0, z),
                Vec3::new(1.0, 1.0, z),
                Vec3::new(-1.0, 1.0, z),
            ],
            fill,
            stroke: Color::BLACK,
        }
    }

    #[test]
    fn test_face_with_vertex_behind_near_plane_is_dropped() {
        let camera = CameraPose::default();
        let settings = ProjectionSettings::default();

        let mut straddling = quad_at(5.0, Color::WHITE);
        straddling.points[2].z = -1.0;
        let faces = vec![quad_at(5.0, Color::WHITE), straddling, quad_at(9.0, Color::WHITE)];

        let drawables = build_drawables(&faces, &camera, &settings, 320.0, 240.0);
        assert_eq!(drawables.len(), 2);
        assert!(drawables.iter().all(|d| d.points.iter().all(|p| p.z >= settings.near_plane)));
    }

    #[test]
    fn test_depth_is_mean_camera_z() {
        let camera = CameraPose::default();
        let settings = ProjectionSettings::default();
        let mut face = quad_at(4.0, Color::WHITE);
        face.points[0].z = 8.0;
        let d = project_face(&face, &camera, &settings, 320.0, 240.0).unwrap();
        assert!((d.depth - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let red = Color::new(255, 0, 0);
        let green = Color::new(0, 255, 0);
        let blue = Color::new(0, 0, 255);
        let faces = vec![
            quad_at(3.0, red),
            quad_at(10.0, green),
            quad_at(3.0, blue),
            quad_at(6.0, Color::WHITE),
        ];
        let drawables = build_drawables(&faces, &CameraPose::default(), &ProjectionSettings::default(), 320.0, 240.0);

        let depths: Vec<f32> = drawables.iter().map(|d| d.depth).collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(drawables[0].fill, green);
        // Equal depths keep submission order
        assert_eq!(drawables[2].fill, red);
        assert_eq!(drawables[3].fill, blue);
    }

    #[test]
    fn test_near_face_paints_over_far_face() {
        let red = Color::new(255, 0, 0);
        let blue = Color::new(0, 0, 255);
        // Submit near first so only the sort can get this right
        let faces = vec![quad_at(4.0, red), quad_at(8.0, blue)];
        let camera = CameraPose::default();
        let settings = ProjectionSettings { near_plane: 0.1, focal_length: 50.0 };

        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::BLACK);
        let drawables = build_drawables(&faces, &camera, &settings, 64.0, 64.0);
        paint_drawables(&mut fb, &drawables);

        assert_eq!(fb.get_pixel(32, 32), red);
    }

    #[test]
    fn test_grid_line_crossing_near_plane_is_clipped_not_dropped() {
        let camera = CameraPose {
            position: Vec3::new(0.0, 2.0, 0.0),
            yaw: 0.0,
            pitch: 0.2,
        };
        let settings = ProjectionSettings::default();
        let lines = [
            WorldLine {
                a: Vec3::ground(0.5, -20.0),
                b: Vec3::ground(0.5, 40.0),
                color: Color::WHITE,
                thickness: 1.0,
            },
            WorldLine {
                a: Vec3::ground(-5.0, -20.0),
                b: Vec3::ground(5.0, -20.0),
                color: Color::WHITE,
                thickness: 1.0,
            },
        ];

        let mut fb = Framebuffer::new(160, 120);
        let drawn = paint_lines(&mut fb, &lines, &camera, &settings);
        assert_eq!(drawn, 1);
    }

    #[test]
    fn test_render_scene_reports_stats() {
        let mut fb = Framebuffer::new(80, 60);
        let mut behind = quad_at(5.0, Color::WHITE);
        behind.points.iter_mut().for_each(|p| p.z = -5.0);
        let faces = vec![quad_at(5.0, Color::WHITE), behind];

        let stats = render_scene(
            &mut fb,
            &faces,
            &[],
            &CameraPose::default(),
            &ProjectionSettings::default(),
            &Backdrop::default(),
        );
        assert_eq!(stats.faces_submitted, 2);
        assert_eq!(stats.faces_drawn, 1);
        assert_eq!(stats.lines_drawn, 0);
    }
}
