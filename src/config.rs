//! Tuning configuration
//!
//! Uses RON (Rusty Object Notation) so the handling and camera constants
//! can be tweaked without a rebuild. Every section is optional.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::camera::{CameraMode, ChaseSettings, RigidCamera};
use crate::rasterizer::{Backdrop, ProjectionSettings};
use crate::scene::{CarPalette, GridSettings, MAX_LINES_PER_AXIS};
use crate::vehicle::VehicleTuning;

/// Looked up when no `--config` is given
pub const DEFAULT_CONFIG_PATH: &str = "assets/drive.ron";

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub mode: CameraMode,
    pub rigid: RigidCamera,
    pub chase: ChaseSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub vehicle: VehicleTuning,
    pub camera: CameraConfig,
    pub projection: ProjectionSettings,
    pub grid: GridSettings,
    pub car: CarPalette,
    pub backdrop: Backdrop,
}

impl GameConfig {
    /// Reject values that parse but cannot drive the simulation:
    /// non-finite numbers, inverted speed or steering ranges, and
    /// projection or grid sizes that degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.vehicle;
        let rigid = &self.camera.rigid;
        let chase = &self.camera.chase;
        let grid = &self.grid;

        let values = [
            ("vehicle.accel", v.accel),
            ("vehicle.brake", v.brake),
            ("vehicle.drag", v.drag),
            ("vehicle.max_forward", v.max_forward),
            ("vehicle.max_reverse", v.max_reverse),
            ("vehicle.turn_rate", v.turn_rate),
            ("vehicle.steer_limit", v.steer_limit),
            ("vehicle.steer_return", v.steer_return),
            ("vehicle.turn_scale", v.turn_scale),
            ("camera.rigid.back", rigid.back),
            ("camera.rigid.height", rigid.height),
            ("camera.rigid.pitch", rigid.pitch),
            ("camera.chase.back", chase.back),
            ("camera.chase.side", chase.side),
            ("camera.chase.height", chase.height),
            ("camera.chase.look_height", chase.look_height),
            ("camera.chase.look_ahead_base", chase.look_ahead_base),
            ("camera.chase.look_ahead_gain", chase.look_ahead_gain),
            ("camera.chase.position_sharpness", chase.position_sharpness),
            ("camera.chase.rotation_sharpness", chase.rotation_sharpness),
            ("projection.near_plane", self.projection.near_plane),
            ("projection.focal_length", self.projection.focal_length),
            ("grid.step", grid.step),
            ("grid.radius", grid.radius),
            ("grid.minor_thickness", grid.minor_thickness),
            ("grid.major_thickness", grid.major_thickness),
        ];
        if let Some((name, value)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(format!("{} must be finite, got {}", name, value)));
        }

        if !(v.max_reverse <= 0.0 && 0.0 <= v.max_forward) {
            return Err(invalid(format!(
                "vehicle speeds need max_reverse <= 0 <= max_forward, got {} and {}",
                v.max_reverse, v.max_forward
            )));
        }

        let non_negative = [
            ("vehicle.accel", v.accel),
            ("vehicle.brake", v.brake),
            ("vehicle.drag", v.drag),
            ("vehicle.turn_rate", v.turn_rate),
            ("vehicle.steer_limit", v.steer_limit),
            ("vehicle.steer_return", v.steer_return),
            ("camera.chase.position_sharpness", chase.position_sharpness),
            ("camera.chase.rotation_sharpness", chase.rotation_sharpness),
            ("grid.radius", grid.radius),
            ("grid.minor_thickness", grid.minor_thickness),
            ("grid.major_thickness", grid.major_thickness),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, value)| *value < 0.0) {
            return Err(invalid(format!("{} must not be negative, got {}", name, value)));
        }

        let positive = [
            ("projection.near_plane", self.projection.near_plane),
            ("projection.focal_length", self.projection.focal_length),
            ("grid.step", grid.step),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, value)| *value <= 0.0) {
            return Err(invalid(format!("{} must be positive, got {}", name, value)));
        }

        if grid.lines_per_axis() > MAX_LINES_PER_AXIS as f32 {
            return Err(invalid(format!(
                "grid.step {} is too fine for radius {} (over {} lines per axis)",
                grid.step, grid.radius, MAX_LINES_PER_AXIS
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

/// Load a config from a RON string and check it
pub fn load_config_from_str(s: &str) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GameConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &GameConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Resolve the startup config.
/// An explicit path must load. The default path is optional: missing
/// means defaults, broken means defaults plus a warning.
pub fn resolve_config(explicit: Option<&Path>) -> Result<GameConfig, ConfigError> {
    if let Some(path) = explicit {
        let config = load_config(path)?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let path = Path::new(DEFAULT_CONFIG_PATH);
    if !path.exists() {
        tracing::debug!("No {} found, using built-in tuning", DEFAULT_CONFIG_PATH);
        return Ok(GameConfig::default());
    }

    match load_config(path) {
        Ok(config) => {
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", path.display(), e);
            Ok(GameConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = load_config_from_str("()").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = load_config_from_str(include_str!("../assets/drive.ron")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = load_config_from_str(
            "(
                vehicle: (accel: 30.0, max_forward: 55.0),
                camera: (mode: rigid, chase: (position_sharpness: 4.0)),
                projection: (near_plane: 0.25),
            )",
        )
        .unwrap();

        assert_eq!(config.vehicle.accel, 30.0);
        assert_eq!(config.vehicle.max_forward, 55.0);
        assert_eq!(config.vehicle.brake, VehicleTuning::default().brake);
        assert_eq!(config.camera.mode, CameraMode::Rigid);
        assert_eq!(config.camera.chase.position_sharpness, 4.0);
        assert_eq!(config.camera.chase.rotation_sharpness, 10.0);
        assert_eq!(config.projection.near_plane, 0.25);
        assert_eq!(config.grid, GridSettings::default());
    }

    #[test]
    fn test_colors_parse() {
        let config = load_config_from_str("(car: (body: (r: 1, g: 2, b: 3, a: 255)))").unwrap();
        assert_eq!(config.car.body, crate::rasterizer::Color::new(1, 2, 3));
    }

    #[test]
    fn test_bad_config_reports_parse_error() {
        let err = load_config_from_str("(vehicle: (accel: \"fast\"))").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    fn assert_invalid(ron_text: &str, field: &str) {
        match load_config_from_str(ron_text) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains(field), "{}: {}", field, msg),
            other => panic!("expected Invalid for {}, got {:?}", field, other),
        }
    }

    #[test]
    fn test_default_config_validates() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_speed_range_is_rejected() {
        assert_invalid("(vehicle: (max_forward: 2.0, max_reverse: 5.0))", "max_reverse");
        assert_invalid("(vehicle: (max_forward: -3.0))", "max_forward");
    }

    #[test]
    fn test_negative_steer_limit_is_rejected() {
        assert_invalid("(vehicle: (steer_limit: -0.2))", "vehicle.steer_limit");
    }

    #[test]
    fn test_degenerate_projection_is_rejected() {
        assert_invalid("(projection: (near_plane: 0.0))", "projection.near_plane");
        assert_invalid("(projection: (focal_length: -10.0))", "projection.focal_length");
    }

    #[test]
    fn test_degenerate_grid_is_rejected() {
        assert_invalid("(grid: (step: 0.0))", "grid.step");
        assert_invalid("(grid: (step: -4.0))", "grid.step");
        assert_invalid("(grid: (step: 0.000001, radius: 80.0))", "too fine");
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let mut config = GameConfig::default();
        config.vehicle.accel = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("vehicle.accel")));

        let mut config = GameConfig::default();
        config.camera.chase.position_sharpness = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("position_sharpness")));
    }

    #[test]
    fn test_validated_tuning_steps_without_panicking() {
        use crate::vehicle::{ControlFlags, VehicleState};

        let config = load_config_from_str("(vehicle: (max_forward: 0.0, max_reverse: 0.0, steer_limit: 0.0))").unwrap();
        let mut car = VehicleState {
            controls: ControlFlags { forward: true, left: true, ..Default::default() },
            ..Default::default()
        };
        car.step(&config.vehicle, 1.0 / 60.0);
        assert_eq!(car.speed, 0.0);
        assert_eq!(car.steer, 0.0);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("bonnie-drive-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("drive.ron");

        let mut config = GameConfig::default();
        config.grid.step = 6.0;
        config.camera.mode = CameraMode::Rigid;
        save_config(&config, &path).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let missing = Path::new("definitely/not/here.ron");
        assert!(matches!(resolve_config(Some(missing)), Err(ConfigError::Io(_))));
    }
}
