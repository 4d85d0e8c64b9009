//! The window as a rasterizer surface

use macroquad::prelude::{self as mq, screen_height, screen_width};
use crate::rasterizer::{Color, Surface};

fn to_mq(c: Color) -> mq::Color {
    mq::Color::from_rgba(c.r, c.g, c.b, c.a)
}

/// Draws straight to the macroquad window
pub struct Screen;

impl Surface for Screen {
    fn width(&self) -> f32 {
        screen_width()
    }

    fn height(&self) -> f32 {
        screen_height()
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        mq::draw_rectangle(x, y, w, h, to_mq(color));
    }

    /// Triangle fan; only valid for convex polygons
    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let c = to_mq(color);
        let (x0, y0) = points[0];
        for pair in points[1..].windows(2) {
            mq::draw_triangle(
                mq::vec2(x0, y0),
                mq::vec2(pair[0].0, pair[0].1),
                mq::vec2(pair[1].0, pair[1].1),
                c,
            );
        }
    }

    fn draw_line(&mut self, a: (f32, f32), b: (f32, f32), thickness: f32, color: Color) {
        mq::draw_line(a.0, a.1, b.0, b.1, thickness, to_mq(color));
    }
}
