//! Procedural car: body, cabin, hood and four wheels built from boxes

use serde::{Serialize, Deserialize};
use crate::rasterizer::{Color, Vec3, WorldFace};
use crate::vehicle::VehicleState;
use super::{BoxPart, Transform};

/// Wheel hub positions relative to the car origin (x, z). Front wheels first.
pub const WHEEL_OFFSETS: [(f32, f32); 4] = [
    (0.95, 1.3),
    (-0.95, 1.3),
    (0.95, -1.3),
    (-0.95, -1.3),
];

const WHEEL_RADIUS: f32 = 0.36;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarPalette {
    pub body: Color,
    pub cabin: Color,
    pub hood: Color,
    pub wheel: Color,
    pub outline: Color,
}

impl Default for CarPalette {
    fn default() -> Self {
        Self {
            body: Color::new(214, 48, 49),
            cabin: Color::new(120, 170, 210),
            hood: Color::new(178, 34, 40),
            wheel: Color::new(28, 28, 32),
            outline: Color::new(16, 16, 20),
        }
    }
}

/// Car geometry in model space. Rebuilt only when the palette changes.
#[derive(Debug, Clone)]
pub struct CarModel {
    pub body: BoxPart,
    pub cabin: BoxPart,
    pub hood: BoxPart,
    pub wheel: BoxPart,
    pub outline: Color,
}

impl CarModel {
    pub fn new(palette: &CarPalette) -> Self {
        Self {
            body: BoxPart::new(Vec3::new(0.0, 0.62, 0.0), Vec3::new(0.9, 0.3, 2.05), palette.body),
            cabin: BoxPart::new(Vec3::new(0.0, 1.18, -0.25), Vec3::new(0.78, 0.26, 1.0), palette.cabin)
                .with_taper(0.12, 0.3, -0.1),
            hood: BoxPart::new(Vec3::new(0.0, 0.96, 1.4), Vec3::new(0.82, 0.04, 0.6), palette.hood)
                .with_taper(0.04, 0.05, 0.0),
            wheel: BoxPart::new(
                Vec3::new(0.0, WHEEL_RADIUS, 0.0),
                Vec3::new(0.17, WHEEL_RADIUS, WHEEL_RADIUS),
                palette.wheel,
            ),
            outline: palette.outline,
        }
    }

    /// Where the car sits in the world
    pub fn vehicle_transform(vehicle: &VehicleState) -> Transform {
        Transform::new(vehicle.heading, vehicle.position())
    }

    /// Local transform of wheel `i`; front wheels turn with the steering
    pub fn wheel_transform(i: usize, steer: f32) -> Transform {
        let (x, z) = WHEEL_OFFSETS[i];
        let yaw = if i < 2 { steer } else { 0.0 };
        Transform::new(yaw, Vec3::new(x, 0.0, z))
    }

    /// All faces of the car in world space
    pub fn world_faces(&self, vehicle: &VehicleState) -> Vec<WorldFace> {
        let root = Self::vehicle_transform(vehicle);
        let mut out = Vec::with_capacity(7 * 6);

        for i in 0..WHEEL_OFFSETS.len() {
            self.wheel
                .placed(Self::wheel_transform(i, vehicle.steer))
                .world_faces(&root, self.outline, &mut out);
        }
        for part in [&self.body, &self.hood, &self.cabin] {
            part.world_faces(&root, self.outline, &mut out);
        }

        out
    }
}
