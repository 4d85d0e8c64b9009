//! Windowed application state
//!
//! Wraps the simulation with the bits only the interactive loop needs:
//! key actions, the HUD, FPS tracking and screenshots.

use std::path::PathBuf;
use macroquad::prelude::*;

use crate::input::Action;
use crate::rasterizer::{Framebuffer, RenderStats};
use crate::sim::Simulation;

/// Where F12 screenshots land
pub const SCREENSHOT_DIR: &str = "screenshots";

/// Simulation speed is in world units per second; the HUD shows km/h
const KMH_PER_UNIT: f32 = 3.6;

pub struct AppState {
    pub sim: Simulation,
    /// Show the debug lines in the HUD
    pub debug: bool,
    pub quit: bool,
    frames_since_fps: u32,
    last_fps_time: f64,
    fps: f64,
    screenshot_count: u32,
    last_stats: RenderStats,
}

impl AppState {
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim,
            debug: false,
            quit: false,
            frames_since_fps: 0,
            last_fps_time: 0.0,
            fps: 0.0,
            screenshot_count: 0,
            last_stats: RenderStats::default(),
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::ToggleCamera => {
                self.sim.toggle_camera();
                tracing::info!("Camera: {}", self.sim.camera_mode().label());
            }
            Action::TogglePause => {
                self.sim.paused = !self.sim.paused;
            }
            Action::ToggleDebug => {
                self.debug = !self.debug;
            }
            Action::Screenshot => self.save_screenshot(),
            Action::ResetVehicle => {
                self.sim.reset_vehicle();
                tracing::info!("Vehicle reset");
            }
            Action::Quit => {
                self.quit = true;
            }
        }
    }

    /// Re-render the current frame in software at window size and write it out
    fn save_screenshot(&mut self) {
        let mut fb = Framebuffer::new(screen_width() as usize, screen_height() as usize);
        self.sim.render(&mut fb);

        self.screenshot_count += 1;
        let path = PathBuf::from(SCREENSHOT_DIR).join(format!("drive-{:03}.png", self.screenshot_count));
        match fb.save_png(&path) {
            Ok(()) => tracing::info!("Saved screenshot {}", path.display()),
            Err(e) => tracing::error!("Screenshot failed: {}", e),
        }
    }

    pub fn record_frame(&mut self, now: f64, stats: RenderStats) {
        self.last_stats = stats;
        self.frames_since_fps += 1;
        let elapsed = now - self.last_fps_time;
        if elapsed >= 1.0 {
            self.fps = self.frames_since_fps as f64 / elapsed;
            self.frames_since_fps = 0;
            self.last_fps_time = now;
        }
    }

    pub fn draw_hud(&self) {
        let vehicle = &self.sim.vehicle;
        let speed = format!("{:>4.0} km/h", vehicle.speed * KMH_PER_UNIT);
        draw_text(&speed, 16.0, 32.0, 32.0, WHITE);

        let hint = format!(
            "[{}] camera  C toggle  P pause  R reset  F1 debug  F12 shot",
            self.sim.camera_mode().label()
        );
        draw_text(&hint, 16.0, screen_height() - 14.0, 18.0, LIGHTGRAY);

        if self.debug {
            let pose = self.sim.camera_pose();
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("FPS: {:.1}", self.fps),
                format!("Pos: ({:.1}, {:.1})", vehicle.x, vehicle.z),
                format!("Heading: {:.1} deg", vehicle.heading.to_degrees()),
                format!("Steer: {:.2}", vehicle.steer),
                format!(
                    "Cam: dist {:.1}  pitch {:.1} deg",
                    (pose.position - vehicle.position()).len(),
                    pose.pitch.to_degrees()
                ),
                format!(
                    "Faces: {}/{}  Lines: {}",
                    self.last_stats.faces_drawn, self.last_stats.faces_submitted, self.last_stats.lines_drawn
                ),
            ];
            for (i, line) in lines.iter().enumerate() {
                draw_text(line, 16.0, 60.0 + i as f32 * 18.0, 18.0, WHITE);
            }
        }

        if self.sim.paused {
            let text = "Paused";
            let size = measure_text(text, None, 40, 1.0);
            draw_text(
                text,
                (screen_width() - size.width) / 2.0,
                (screen_height() - size.height) / 2.0,
                40.0,
                WHITE,
            );
        }
    }
}
