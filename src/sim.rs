//! Simulation context: everything that changes from frame to frame,
//! owned by the frame loop and updated in place.

use crate::camera::{CameraMode, CameraRig};
use crate::config::GameConfig;
use crate::rasterizer::{render_scene, CameraPose, RenderStats, Surface, WorldFace, WorldLine};
use crate::scene::{grid_lines, CarModel};
use crate::vehicle::{clamp_dt, ControlFlags, VehicleState};

/// Turns monotonic timestamps (seconds) into clamped frame deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Delta since the previous tick, clamped. The first tick is zero.
    pub fn tick(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        clamp_dt(dt)
    }
}

pub struct Simulation {
    pub config: GameConfig,
    pub vehicle: VehicleState,
    pub camera: CameraRig,
    pub clock: FrameClock,
    pub paused: bool,
    car: CarModel,
    /// Pose used for the most recent frame
    pose: CameraPose,
}

impl Simulation {
    pub fn new(config: GameConfig) -> Self {
        let camera = CameraRig::new(config.camera.mode, config.camera.rigid, config.camera.chase);
        let car = CarModel::new(&config.car);
        let mut sim = Self {
            config,
            vehicle: VehicleState::default(),
            camera,
            clock: FrameClock::new(),
            paused: false,
            car,
            pose: CameraPose::default(),
        };
        sim.pose = sim.camera.update(&sim.vehicle, 0.0);
        sim
    }

    /// One frame from the loop: read the clock, then step
    pub fn frame(&mut self, now: f64, controls: ControlFlags) -> CameraPose {
        let dt = self.clock.tick(now);
        if self.paused {
            return self.pose;
        }
        self.step(controls, dt)
    }

    /// Advance vehicle and camera by `dt` seconds
    pub fn step(&mut self, controls: ControlFlags, dt: f32) -> CameraPose {
        let dt = clamp_dt(dt);
        self.vehicle.controls = controls;
        self.vehicle.step(&self.config.vehicle, dt);
        self.pose = self.camera.update(&self.vehicle, dt);
        self.pose
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.pose
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera.mode()
    }

    /// Switch camera policy; a new chase camera snaps on its first frame
    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        if mode == self.camera.mode() {
            return;
        }
        let cfg = &self.config.camera;
        self.camera = CameraRig::new(mode, cfg.rigid, cfg.chase);
        self.pose = self.camera.update(&self.vehicle, 0.0);
        tracing::debug!("Camera mode: {}", mode.label());
    }

    pub fn toggle_camera(&mut self) {
        self.set_camera_mode(self.camera.mode().toggled());
    }

    /// Put the car back at the origin at rest
    pub fn reset_vehicle(&mut self) {
        self.vehicle = VehicleState::default();
        self.camera.reset();
        self.pose = self.camera.update(&self.vehicle, 0.0);
    }

    /// World-space geometry for this frame
    pub fn scene(&self) -> (Vec<WorldFace>, Vec<WorldLine>) {
        let faces = self.car.world_faces(&self.vehicle);
        let lines = grid_lines(self.vehicle.position(), &self.config.grid);
        (faces, lines)
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> RenderStats {
        let (faces, lines) = self.scene();
        render_scene(
            surface,
            &faces,
            &lines,
            &self.pose,
            &self.config.projection,
            &self.config.backdrop,
        )
    }
}
