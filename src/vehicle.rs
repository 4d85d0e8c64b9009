//! Arcade car kinematics
//!
//! Not a physics model: speed is a single scalar along the heading,
//! steering is a damped bounded angle, and the turn rate scales with
//! how fast the car is moving so it cannot spin on the spot.

use serde::{Serialize, Deserialize};
use crate::rasterizer::{approach_zero, forward_vector, wrap_angle, Vec3};

/// Largest integration step. Longer frames (stalls, backgrounded window)
/// are simulated as if only this much time had passed.
pub const MAX_STEP: f32 = 0.033;

/// Clamp a raw frame delta into a safe integration step
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_STEP)
}

/// Held state of the four driving controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl ControlFlags {
    /// +1 for left, -1 for right, 0 for both or neither
    pub fn steer_input(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

/// Handling constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Throttle acceleration (units/s^2)
    pub accel: f32,
    /// Brake/reverse deceleration (units/s^2)
    pub brake: f32,
    /// Coasting deceleration toward rest (units/s^2)
    pub drag: f32,
    pub max_forward: f32,
    /// Top reverse speed, negative
    pub max_reverse: f32,
    /// Steering ramp while a direction is held (rad/s)
    pub turn_rate: f32,
    pub steer_limit: f32,
    /// Steering self-centering rate (rad/s)
    pub steer_return: f32,
    /// Heading change per unit steer at top speed (1/s)
    pub turn_scale: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            accel: 24.0,
            brake: 30.0,
            drag: 10.0,
            max_forward: 40.0,
            max_reverse: -12.0,
            turn_rate: 2.2,
            steer_limit: 0.6,
            steer_return: 3.0,
            turn_scale: 1.6,
        }
    }
}

/// Pose and motion of the player car
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleState {
    pub x: f32,
    pub z: f32,
    /// Radians, 0 faces +z
    pub heading: f32,
    pub speed: f32,
    pub steer: f32,
    pub controls: ControlFlags,
}

impl VehicleState {
    pub fn position(&self) -> Vec3 {
        Vec3::ground(self.x, self.z)
    }

    pub fn forward(&self) -> Vec3 {
        forward_vector(self.heading)
    }

    /// Advance one frame using the currently held controls
    pub fn step(&mut self, tuning: &VehicleTuning, dt: f32) {
        let dt = clamp_dt(dt);

        // Longitudinal: forward wins if both pedals are down
        if self.controls.forward {
            self.speed += tuning.accel * dt;
        } else if self.controls.backward {
            self.speed -= tuning.brake * dt;
        } else {
            self.speed = approach_zero(self.speed, tuning.drag * dt);
        }
        self.speed = self.speed.clamp(tuning.max_reverse, tuning.max_forward);

        // Lateral
        let input = self.controls.steer_input();
        if input != 0.0 {
            self.steer = (self.steer + input * tuning.turn_rate * dt)
                .clamp(-tuning.steer_limit, tuning.steer_limit);
        } else {
            self.steer = approach_zero(self.steer, tuning.steer_return * dt);
        }

        let speed_fraction = if tuning.max_forward > 0.0 {
            self.speed / tuning.max_forward
        } else {
            0.0
        };
        self.heading = wrap_angle(self.heading + self.steer * speed_fraction * tuning.turn_scale * dt);

        let (s, c) = self.heading.sin_cos();
        self.x += s * self.speed * dt;
        self.z += c * self.speed * dt;
    }
}
