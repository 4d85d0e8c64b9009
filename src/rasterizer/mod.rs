//! Software painter's-algorithm rasterizer
//!
//! Features:
//! - Yaw/pitch pinhole camera with a fixed focal length
//! - Near-plane rejection (faces) and clipping (lines)
//! - Back-to-front sorting by mean face depth, no z-buffer
//! - Works against any `Surface`: the window or an in-memory framebuffer

mod math;
mod types;
mod render;
mod painter;

pub use math::*;
pub use types::*;
pub use render::*;
pub use painter::*;
