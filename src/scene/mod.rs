//! Scene builder - procedural geometry placed in world space each frame
//!
//! - Boxes with a fixed 8-corner / 6-quad topology
//! - Explicit parent x part transforms (no object hierarchy)
//! - Ground grid recentred around the car

mod car;
mod grid;

pub use car::*;
pub use grid::*;

use crate::rasterizer::{Color, Face, Vec3, WorldFace};

/// Yaw rotation followed by a translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub yaw: f32,
    pub translation: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { yaw: 0.0, translation: Vec3::ZERO };

    pub fn new(yaw: f32, translation: Vec3) -> Self {
        Self { yaw, translation }
    }

    #[cfg(test)]
    pub fn from_translation(translation: Vec3) -> Self {
        Self { yaw: 0.0, translation }
    }

    pub fn apply(&self, p: Vec3) -> Vec3 {
        p.rotate_y(self.yaw) + self.translation
    }

    /// `self x child`: applying the result equals applying `child` then `self`
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            yaw: self.yaw + child.yaw,
            translation: self.apply(child.translation),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Quad order: bottom, top, back, right, front, left.
/// Corners 0-3 are the bottom ring, 4-7 the top ring directly above them.
pub const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [3, 0, 4, 7],
    [2, 3, 7, 6],
    [1, 2, 6, 5],
];

/// Fixed per-side brightness so boxes read as solid without lighting
const BOX_FACE_SHADES: [f32; 6] = [0.45, 1.0, 0.72, 0.82, 0.9, 0.82];

/// One convex box of a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPart {
    pub center: Vec3,
    pub half_extents: Vec3,
    /// Inward pull of the top ring on x and z (a cabin narrows toward the roof)
    pub top_inset: (f32, f32),
    /// Slide of the top ring along z (raked windscreen)
    pub top_shift: f32,
    pub fill: Color,
    /// Placement relative to the model origin
    pub local: Transform,
}

impl BoxPart {
    pub fn new(center: Vec3, half_extents: Vec3, fill: Color) -> Self {
        Self {
            center,
            half_extents,
            top_inset: (0.0, 0.0),
            top_shift: 0.0,
            fill,
            local: Transform::IDENTITY,
        }
    }

    pub fn with_taper(mut self, inset_x: f32, inset_z: f32, shift_z: f32) -> Self {
        self.top_inset = (inset_x, inset_z);
        self.top_shift = shift_z;
        self
    }

    pub fn placed(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }

    /// Corners in part space
    pub fn vertices(&self) -> [Vec3; 8] {
        let c = self.center;
        let h = self.half_extents;
        let (tx, tz) = (h.x - self.top_inset.0, h.z - self.top_inset.1);
        let bottom = c.y - h.y;
        let top = c.y + h.y;
        let sz = self.top_shift;

        [
            Vec3::new(c.x - h.x, bottom, c.z - h.z),
            Vec3::new(c.x + h.x, bottom, c.z - h.z),
            Vec3::new(c.x + h.x, bottom, c.z + h.z),
            Vec3::new(c.x - h.x, bottom, c.z + h.z),
            Vec3::new(c.x - tx, top, c.z - tz + sz),
            Vec3::new(c.x + tx, top, c.z - tz + sz),
            Vec3::new(c.x + tx, top, c.z + tz + sz),
            Vec3::new(c.x - tx, top, c.z + tz + sz),
        ]
    }

    /// The six quads with their colours
    pub fn faces(&self, stroke: Color) -> [Face; 6] {
        std::array::from_fn(|i| Face::new(BOX_FACES[i], self.fill.shade(BOX_FACE_SHADES[i]), stroke))
    }

    /// Place the part under `parent` and emit its faces in world space
    pub fn world_faces(&self, parent: &Transform, stroke: Color, out: &mut Vec<WorldFace>) {
        let to_world = parent.compose(&self.local);
        let corners = self.vertices().map(|v| to_world.apply(v));

        out.extend(self.faces(stroke).iter().map(|face| WorldFace {
            points: face.indices.iter().map(|&i| corners[i]).collect(),
            fill: face.fill,
            stroke: face.stroke,
        }));
    }
}
