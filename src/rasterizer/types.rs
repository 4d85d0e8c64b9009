//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::Vec3;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    #[cfg(test)]
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[cfg(test)]
    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale RGB by a brightness factor (0.0-1.0), alpha untouched
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Blend toward `other` by `t` (0.0 = self, 1.0 = other)
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Viewer frame: where the camera sits and where it points.
/// Pitch is positive when looking down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Pinhole camera parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Minimum camera-space depth that still projects
    pub near_plane: f32,
    /// Distance from the pinhole to the image plane, in pixels
    pub focal_length: f32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            near_plane: 0.1,
            focal_length: 560.0,
        }
    }
}

/// A vertex after projection: screen position plus camera depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A quad face (indices into a part's vertex list)
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub indices: [usize; 4],
    pub fill: Color,
    pub stroke: Color,
}

impl Face {
    pub fn new(indices: [usize; 4], fill: Color, stroke: Color) -> Self {
        Self { indices, fill, stroke }
    }
}

/// A closed convex loop already placed in world space
#[derive(Debug, Clone)]
pub struct WorldFace {
    pub points: Vec<Vec3>,
    pub fill: Color,
    pub stroke: Color,
}

/// A world-space line segment (ground grid)
#[derive(Debug, Clone, Copy)]
pub struct WorldLine {
    pub a: Vec3,
    pub b: Vec3,
    pub color: Color,
    pub thickness: f32,
}

/// Sky and ground gradients painted behind everything else
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backdrop {
    pub sky_top: Color,
    pub sky_horizon: Color,
    pub ground_horizon: Color,
    pub ground_near: Color,
}

impl Default for Backdrop {
    fn default() -> Self {
        Self {
            sky_top: Color::new(38, 64, 122),
            sky_horizon: Color::new(176, 204, 232),
            ground_horizon: Color::new(92, 108, 96),
            ground_near: Color::new(40, 52, 44),
        }
    }
}

/// A projected face ready for painting
#[derive(Debug, Clone)]
pub struct Drawable {
    pub points: Vec<ProjectedPoint>,
    pub fill: Color,
    pub stroke: Color,
    /// Mean camera-space depth of the face's vertices
    pub depth: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp_endpoints() {
        let a = Color::new(10, 20, 30);
        let b = Color::new(110, 220, 130);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::new(60, 120, 80));
    }
}
