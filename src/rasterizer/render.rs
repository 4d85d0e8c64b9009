//! Drawing surfaces
//! The painter talks to a `Surface`; `Framebuffer` is the in-memory one.

use std::fs;
use std::path::Path;
use thiserror::Error;
use super::types::Color;

/// Horizontal bands used to fake a vertical gradient on surfaces
/// that can only fill solid rectangles
const GRADIENT_BANDS: usize = 48;

/// Immediate-mode 2D target the rasterizer paints onto.
/// Coordinates are pixels, origin top-left, y down.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    /// Fill a convex polygon
    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color);

    fn draw_line(&mut self, a: (f32, f32), b: (f32, f32), thickness: f32, color: Color);

    /// Outline a closed polygon
    fn stroke_polygon(&mut self, points: &[(f32, f32)], thickness: f32, color: Color) {
        if points.len() < 2 {
            return;
        }
        for i in 0..points.len() {
            let next = points[(i + 1) % points.len()];
            self.draw_line(points[i], next, thickness, color);
        }
    }

    fn fill_vertical_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, top: Color, bottom: Color) {
        if h <= 0.0 {
            return;
        }
        let band = h / GRADIENT_BANDS as f32;
        for i in 0..GRADIENT_BANDS {
            let t = i as f32 / (GRADIENT_BANDS - 1) as f32;
            // Overlap by a pixel so bands never leave seams
            self.fill_rect(x, y + band * i as f32, w, band + 1.0, top.lerp(bottom, t));
        }
    }
}

/// Error type for framebuffer capture
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("framebuffer {width}x{height} does not match its {len} byte buffer")]
    BufferSize { width: usize, height: usize, len: usize },
}

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    /// Opaque black buffer
    pub fn new(width: usize, height: usize) -> Self {
        let mut fb = Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        };
        fb.clear(Color::BLACK);
        fb
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let p = &self.pixels[idx..idx + 4];
            Color::with_alpha(p[0], p[1], p[2], p[3])
        } else {
            Color::BLACK
        }
    }

    fn fill_span(&mut self, y: usize, x0: usize, x1: usize, color: Color) {
        let bytes = color.to_bytes();
        let row = y * self.width * 4;
        for px in self.pixels[row + x0 * 4..row + x1 * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line_px(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
                self.set_pixel(x as usize, y as usize, color);
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a thick line by drawing multiple parallel lines
    pub fn draw_thick_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, thickness: i32, color: Color) {
        if thickness <= 1 {
            self.draw_line_px(x0, y0, x1, y1, color);
            return;
        }

        // Calculate perpendicular offset
        let dx = (x1 - x0) as f32;
        let dy = (y1 - y0) as f32;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 0.001 {
            return;
        }

        let px = -dy / len;
        let py = dx / len;

        let half_thickness = thickness / 2;
        for i in -half_thickness..=half_thickness {
            let offset = i as f32;
            let ox0 = (x0 as f32 + px * offset) as i32;
            let oy0 = (y0 as f32 + py * offset) as i32;
            let ox1 = (x1 as f32 + px * offset) as i32;
            let oy1 = (y1 as f32 + py * offset) as i32;
            self.draw_line_px(ox0, oy0, ox1, oy1, color);
        }
    }

    /// Write the framebuffer out as a PNG, creating parent directories
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), CaptureError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let image = image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
            .ok_or(CaptureError::BufferSize {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
            })?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Liang-Barsky clip of a segment against an axis-aligned box
fn clip_line_to_rect(
    a: (f32, f32),
    b: (f32, f32),
    min: (f32, f32),
    max: (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0: f32 = 0.0;
    let mut t1: f32 = 1.0;

    for (p, q) in [
        (-dx, a.0 - min.0),
        (dx, max.0 - a.0),
        (-dy, a.1 - min.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 {
        return None;
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

impl Surface for Framebuffer {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let x0 = x.max(0.0).round() as usize;
        let y0 = y.max(0.0).round() as usize;
        let x1 = ((x + w).round().max(0.0) as usize).min(self.width);
        let y1 = ((y + h).round().max(0.0) as usize).min(self.height);
        if x0 >= x1 {
            return;
        }
        for row in y0..y1 {
            self.fill_span(row, x0, x1, color);
        }
    }

    /// Scanline fill sampled at pixel centers (even-odd rule)
    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if points.len() < 3 || self.width == 0 {
            return;
        }

        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let y_start = min_y.floor().max(0.0) as usize;
        let y_end = (max_y.ceil().max(0.0) as usize).min(self.height);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y_start..y_end {
            let py = y as f32 + 0.5;
            crossings.clear();

            for i in 0..points.len() {
                let (ax, ay) = points[i];
                let (bx, by) = points[(i + 1) % points.len()];
                if (ay <= py && py < by) || (by <= py && py < ay) {
                    crossings.push(ax + (py - ay) * (bx - ax) / (by - ay));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for pair in crossings.chunks_exact(2) {
                let x0 = (pair[0] - 0.5).ceil().max(0.0) as usize;
                let x1 = ((pair[1] - 0.5).ceil().max(0.0) as usize).min(self.width);
                if x0 < x1 {
                    self.fill_span(y, x0, x1, color);
                }
            }
        }
    }

    fn draw_line(&mut self, a: (f32, f32), b: (f32, f32), thickness: f32, color: Color) {
        // Keep Bresenham from walking far outside the buffer
        let margin = thickness + 1.0;
        let bounds_max = (self.width as f32 + margin, self.height as f32 + margin);
        let Some((a, b)) = clip_line_to_rect(a, b, (-margin, -margin), bounds_max) else {
            return;
        };
        self.draw_thick_line(
            a.0.round() as i32,
            a.1.round() as i32,
            b.0.round() as i32,
            b.1.round() as i32,
            thickness.round() as i32,
            color,
        );
    }

    fn fill_vertical_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, top: Color, bottom: Color) {
        if h <= 0.0 {
            return;
        }
        let y0 = y.max(0.0).round() as usize;
        let y1 = ((y + h).round().max(0.0) as usize).min(self.height);
        for row in y0..y1 {
            let t = (row as f32 + 0.5 - y) / h;
            self.fill_rect(x, row as f32, w, 1.0, top.lerp(bottom, t));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);

    #[test]
    fn test_new_buffer_is_opaque_black() {
        let fb = Framebuffer::new(3, 2);
        assert!(fb.pixels.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
        assert_eq!(fb.get_pixel(2, 1), Color::BLACK);
    }

    #[test]
    fn test_fill_polygon_covers_interior_only() {
        let mut fb = Framebuffer::new(20, 20);
        fb.clear(Color::BLACK);
        fb.fill_polygon(&[(2.0, 2.0), (12.0, 2.0), (12.0, 12.0), (2.0, 12.0)], RED);

        assert_eq!(fb.get_pixel(2, 2), RED);
        assert_eq!(fb.get_pixel(11, 11), RED);
        assert_eq!(fb.get_pixel(12, 12), Color::BLACK);
        assert_eq!(fb.get_pixel(1, 5), Color::BLACK);

        let filled = fb.pixels.chunks_exact(4).filter(|p| p[0] == 255).count();
        assert_eq!(filled, 100);
    }

    #[test]
    fn test_fill_polygon_clips_to_bounds() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(Color::BLACK);
        fb.fill_polygon(&[(-50.0, -50.0), (50.0, -50.0), (50.0, 50.0), (-50.0, 50.0)], RED);
        assert!(fb.pixels.chunks_exact(4).all(|p| p[0] == 255));
    }

    #[test]
    fn test_stroke_polygon_draws_outline() {
        let mut fb = Framebuffer::new(16, 16);
        fb.clear(Color::BLACK);
        fb.stroke_polygon(&[(2.0, 2.0), (10.0, 2.0), (10.0, 10.0), (2.0, 10.0)], 1.0, RED);
        assert_eq!(fb.get_pixel(6, 2), RED);
        assert_eq!(fb.get_pixel(10, 6), RED);
        assert_eq!(fb.get_pixel(6, 6), Color::BLACK);
    }

    #[test]
    fn test_vertical_gradient_runs_top_to_bottom() {
        let mut fb = Framebuffer::new(4, 10);
        fb.fill_vertical_gradient(0.0, 0.0, 4.0, 10.0, Color::BLACK, Color::WHITE);
        assert!(fb.get_pixel(0, 0).r < 30);
        assert!(fb.get_pixel(0, 9).r > 225);
        assert!(fb.get_pixel(0, 4).r < fb.get_pixel(0, 5).r);
    }

    #[test]
    fn test_draw_line_clips_far_endpoints() {
        let mut fb = Framebuffer::new(10, 10);
        fb.clear(Color::BLACK);
        fb.draw_line((5.0, -1.0e7), (5.0, 1.0e7), 1.0, RED);
        assert_eq!(fb.get_pixel(5, 0), RED);
        assert_eq!(fb.get_pixel(5, 9), RED);

        assert!(clip_line_to_rect((-5.0, -5.0), (-1.0, -9.0), (0.0, 0.0), (10.0, 10.0)).is_none());
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = std::env::temp_dir().join(format!("bonnie-drive-png-{}", std::process::id()));
        let path = dir.join("nested").join("frame.png");
        let mut fb = Framebuffer::new(6, 4);
        fb.clear(RED);
        fb.save_png(&path).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_png_rejects_mismatched_buffer() {
        let mut fb = Framebuffer::new(4, 4);
        fb.pixels.truncate(10);
        let err = fb.save_png(std::env::temp_dir().join("bonnie-drive-bad.png")).unwrap_err();
        assert!(matches!(err, CaptureError::BufferSize { .. }));
    }
}
