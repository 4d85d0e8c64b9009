//! Vector and angle math for the driving scene
//!
//! Conventions: y is up, heading/yaw 0 faces +z, and the world is
//! right-handed so +x sits on the viewer's left when looking down +z.

use std::f32::consts::{PI, TAU};
use std::ops::{Add, Mul, Sub};
use serde::{Serialize, Deserialize};

use super::types::{CameraPose, ProjectedPoint, ProjectionSettings};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane (y = 0)
    pub fn ground(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Component-wise linear interpolation
    pub fn lerp(self, target: Vec3, t: f32) -> Vec3 {
        self + (target - self) * t
    }

    /// Rotate about the vertical axis by `angle` radians.
    /// A rotation of `h` maps local forward (+z) onto heading `h`.
    pub fn rotate_y(self, angle: f32) -> Vec3 {
        let (s, c) = angle.sin_cos();
        Vec3 {
            x: self.x * c + self.z * s,
            y: self.y,
            z: -self.x * s + self.z * c,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// Unit vector along a heading on the ground plane
pub fn forward_vector(heading: f32) -> Vec3 {
    let (s, c) = heading.sin_cos();
    Vec3::new(s, 0.0, c)
}

/// Unit vector to the right of a heading on the ground plane
pub fn right_vector(heading: f32) -> Vec3 {
    let (s, c) = heading.sin_cos();
    Vec3::new(-c, 0.0, s)
}

/// Wrap an angle into (-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let mut a = (angle + PI).rem_euclid(TAU) - PI;
    if a <= -PI {
        a += TAU;
    }
    a
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate between two angles along the shorter arc.
/// The result is wrapped into (-PI, PI].
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let delta = wrap_angle(to - from);
    wrap_angle(from + delta * t)
}

/// Move `value` toward zero by `amount` without crossing it
pub fn approach_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        0.0
    }
}

/// Frame-rate independent easing weight: `1 - e^(-sharpness * dt)`
pub fn smoothing_factor(sharpness: f32, dt: f32) -> f32 {
    1.0 - (-sharpness * dt).exp()
}

/// Transform a world-space point into camera space.
/// Translate, rotate by -yaw about the vertical axis, then by -pitch
/// about the camera's horizontal axis. The result has +z forward,
/// +x to the camera's right and +y up.
pub fn world_to_camera(p: Vec3, camera: &CameraPose) -> Vec3 {
    let d = p - camera.position;

    let (sy, cy) = camera.yaw.sin_cos();
    let x = -d.x * cy + d.z * sy;
    let z = d.x * sy + d.z * cy;

    let (sp, cp) = camera.pitch.sin_cos();
    Vec3 {
        x,
        y: d.y * cp + z * sp,
        z: z * cp - d.y * sp,
    }
}

/// Perspective-divide a camera-space point onto a `width` x `height` surface.
/// Returns None when the point is closer than the near plane.
pub fn project(v: Vec3, settings: &ProjectionSettings, width: f32, height: f32) -> Option<ProjectedPoint> {
    if v.z < settings.near_plane {
        return None;
    }

    let f = settings.focal_length;
    Some(ProjectedPoint {
        x: width / 2.0 + v.x * f / v.z,
        y: height / 2.0 - v.y * f / v.z,
        z: v.z,
    })
}

/// World point straight to the screen
pub fn project_world(
    p: Vec3,
    camera: &CameraPose,
    settings: &ProjectionSettings,
    width: f32,
    height: f32,
) -> Option<ProjectedPoint> {
    project(world_to_camera(p, camera), settings, width, height)
}

/// Cut a camera-space segment at the near plane.
/// Returns None if both ends are behind it.
pub fn clip_segment_near(a: Vec3, b: Vec3, near: f32) -> Option<(Vec3, Vec3)> {
    match (a.z >= near, b.z >= near) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (a_in, _) => {
            let t = (near - a.z) / (b.z - a.z);
            let cut = a.lerp(b, t);
            // Pin exactly onto the plane so float error can't push it back behind
            let cut = Vec3 { z: near, ..cut };
            if a_in {
                Some((a, cut))
            } else {
                Some((cut, b))
            }
        }
    }
}

/// Screen row of the horizon for a camera pitched by `pitch`
pub fn horizon_y(pitch: f32, settings: &ProjectionSettings, height: f32) -> f32 {
    (height / 2.0 - settings.focal_length * pitch.tan()).clamp(0.0, height)
}
