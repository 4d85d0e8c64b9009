//! Ground grid. A finite patch of lines follows the car, snapped to the
//! step so the pattern looks fixed to the ground.

use serde::{Serialize, Deserialize};
use crate::rasterizer::{Color, Vec3, WorldLine};

/// Most lines generated along one axis per frame
pub const MAX_LINES_PER_AXIS: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Spacing between lines
    pub step: f32,
    /// Half-size of the square patch around the car
    pub radius: f32,
    /// Every Nth line is a major line
    pub major_every: u32,
    pub minor_color: Color,
    pub major_color: Color,
    pub minor_thickness: f32,
    pub major_thickness: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            step: 4.0,
            radius: 80.0,
            major_every: 5,
            minor_color: Color::new(78, 94, 82),
            major_color: Color::new(44, 56, 48),
            minor_thickness: 1.0,
            major_thickness: 2.0,
        }
    }
}

impl GridSettings {
    /// Upper bound on the lines one axis of the patch can hold
    pub fn lines_per_axis(&self) -> f32 {
        2.0 * self.radius / self.step + 1.0
    }
}

/// Is the line at `index * step` a major one
pub fn is_major(index: i64, major_every: u32) -> bool {
    major_every > 0 && index.rem_euclid(major_every as i64) == 0
}

/// Grid lines around `center`, minor lines first so majors paint over them
pub fn grid_lines(center: Vec3, settings: &GridSettings) -> Vec<WorldLine> {
    if !(settings.step > 0.0 && settings.radius > 0.0) {
        return Vec::new();
    }
    if !(settings.lines_per_axis() <= MAX_LINES_PER_AXIS as f32) {
        return Vec::new();
    }

    let step = settings.step;
    let r = settings.radius;
    let index_range = |c: f32| ((c - r) / step).ceil() as i64..=((c + r) / step).floor() as i64;

    let mut minor = Vec::new();
    let mut major = Vec::new();

    // Lines of constant x run along z
    for i in index_range(center.x) {
        let x = i as f32 * step;
        let (a, b) = (Vec3::ground(x, center.z - r), Vec3::ground(x, center.z + r));
        let target = if is_major(i, settings.major_every) { &mut major } else { &mut minor };
        target.push((a, b));
    }
    for i in index_range(center.z) {
        let z = i as f32 * step;
        let (a, b) = (Vec3::ground(center.x - r, z), Vec3::ground(center.x + r, z));
        let target = if is_major(i, settings.major_every) { &mut major } else { &mut minor };
        target.push((a, b));
    }

    let style = |(a, b): (Vec3, Vec3), color: Color, thickness: f32| WorldLine { a, b, color, thickness };
    minor
        .into_iter()
        .map(|ab| style(ab, settings.minor_color, settings.minor_thickness))
        .chain(
            major
                .into_iter()
                .map(|ab| style(ab, settings.major_color, settings.major_thickness)),
        )
        .collect()
}
