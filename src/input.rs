//! Keyboard snapshot, taken once per frame

use macroquad::prelude::*;
use crate::vehicle::ControlFlags;

/// Driving controls: arrow keys or WASD
pub fn read_controls() -> ControlFlags {
    ControlFlags {
        forward: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
        backward: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
        left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
        right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
    }
}

/// One-shot actions triggered on key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleCamera,
    TogglePause,
    ToggleDebug,
    Screenshot,
    ResetVehicle,
    Quit,
}

const BINDINGS: [(KeyCode, Action); 6] = [
    (KeyCode::C, Action::ToggleCamera),
    (KeyCode::P, Action::TogglePause),
    (KeyCode::F1, Action::ToggleDebug),
    (KeyCode::F12, Action::Screenshot),
    (KeyCode::R, Action::ResetVehicle),
    (KeyCode::Escape, Action::Quit),
];

/// Actions whose key went down this frame
pub fn pressed_actions() -> Vec<Action> {
    BINDINGS
        .iter()
        .filter(|(key, _)| is_key_pressed(*key))
        .map(|(_, action)| *action)
        .collect()
}
