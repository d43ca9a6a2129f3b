//! Fixed key binding table.
//!
//! Movement keys are not listed here; they are held-state and go straight to
//! [`crate::camera::CameraController`].

use cgmath::Vector3;
use winit::keyboard::KeyCode;

use crate::state::ProgramState;

const EXPOSURE_STEP: f32 = 0.01;
const AMBIENT_STEP: f32 = 0.005;
const PROP_SCALE_STEP: f32 = 0.05;
const PROP_SCALE_RANGE: (f32, f32) = (0.1, 4.0);
const PROP_MOVE_STEP: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Exit,
    ToggleGui,
    ToggleAntiAliasing,
    ToggleGrayscale,
    ToggleHdr,
    ToggleBloom,
    ExposureDown,
    ExposureUp,
    ToggleCameraMouse,
    ResetCamera,
    ToggleSpotlight,
    AmbientUp,
    AmbientDown,
    PropScaleUp,
    PropScaleDown,
    /// Prop position steps along -X/+X, +Y/-Y and -Z/+Z.
    PropLeft,
    PropRight,
    PropUp,
    PropDown,
    PropFar,
    PropNear,
}

/// What the window has to do after an action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Exit,
    /// `true` grabs and hides the cursor, `false` releases it.
    CursorGrab(bool),
}

/// Map a pressed key to an action.
///
/// Exposure and the GUI sliders keep stepping while the key is held; every
/// other binding fires once per press. With `ctrl` held the arrow keys move
/// the prop instead of changing ambient strength and scale.
pub fn binding(key: KeyCode, repeat: bool, ctrl: bool) -> Option<Action> {
    let held = match (key, ctrl) {
        (KeyCode::KeyQ, _) => Some(Action::ExposureDown),
        (KeyCode::KeyE, _) => Some(Action::ExposureUp),
        (KeyCode::PageUp, _) => Some(Action::PropUp),
        (KeyCode::PageDown, _) => Some(Action::PropDown),
        (KeyCode::ArrowUp, true) => Some(Action::PropFar),
        (KeyCode::ArrowDown, true) => Some(Action::PropNear),
        (KeyCode::ArrowRight, true) => Some(Action::PropRight),
        (KeyCode::ArrowLeft, true) => Some(Action::PropLeft),
        (KeyCode::ArrowUp, false) => Some(Action::AmbientUp),
        (KeyCode::ArrowDown, false) => Some(Action::AmbientDown),
        (KeyCode::ArrowRight, false) => Some(Action::PropScaleUp),
        (KeyCode::ArrowLeft, false) => Some(Action::PropScaleDown),
        _ => None,
    };
    if held.is_some() {
        return held;
    }
    let action = match key {
        KeyCode::Escape => Action::Exit,
        KeyCode::F1 => Action::ToggleGui,
        KeyCode::F2 => Action::ToggleAntiAliasing,
        KeyCode::F3 => Action::ToggleGrayscale,
        KeyCode::KeyH => Action::ToggleHdr,
        KeyCode::KeyB => Action::ToggleBloom,
        KeyCode::KeyC => Action::ToggleCameraMouse,
        KeyCode::KeyP => Action::ResetCamera,
        KeyCode::KeyK => Action::ToggleSpotlight,
        _ => return None,
    };
    (!repeat).then_some(action)
}

pub fn apply(action: Action, state: &mut ProgramState) -> Effect {
    match action {
        Action::Exit => return Effect::Exit,
        Action::ToggleGui => {
            state.gui_enabled = !state.gui_enabled;
            if state.gui_enabled {
                state.camera_mouse_movement_enabled = false;
                return Effect::CursorGrab(false);
            }
            state.camera_mouse_movement_enabled = true;
            return Effect::CursorGrab(true);
        }
        Action::ToggleCameraMouse => {
            if !state.gui_enabled {
                return Effect::None;
            }
            state.camera_mouse_movement_enabled = !state.camera_mouse_movement_enabled;
            return Effect::CursorGrab(state.camera_mouse_movement_enabled);
        }
        Action::ToggleAntiAliasing => state.aa_enabled = !state.aa_enabled,
        Action::ToggleGrayscale => state.grayscale_enabled = !state.grayscale_enabled,
        Action::ToggleHdr => {
            state.hdr = !state.hdr;
            log::info!("hdr: {}", if state.hdr { "on" } else { "off" });
        }
        Action::ToggleBloom => {
            state.bloom = !state.bloom;
            log::info!("bloom: {}", if state.bloom { "on" } else { "off" });
        }
        Action::ExposureDown => state.exposure = (state.exposure - EXPOSURE_STEP).max(0.0),
        Action::ExposureUp => state.exposure += EXPOSURE_STEP,
        Action::ResetCamera => state.camera.reset(),
        Action::ToggleSpotlight => state.spotlight = !state.spotlight,
        Action::AmbientUp | Action::AmbientDown if state.gui_enabled => {
            let step = if action == Action::AmbientUp { AMBIENT_STEP } else { -AMBIENT_STEP };
            state.ambient_strength = (state.ambient_strength + step).clamp(0.0, 1.0);
        }
        Action::PropScaleUp | Action::PropScaleDown if state.gui_enabled => {
            let step = if action == Action::PropScaleUp { PROP_SCALE_STEP } else { -PROP_SCALE_STEP };
            let (min, max) = PROP_SCALE_RANGE;
            state.prop_scale = (state.prop_scale + step).clamp(min, max);
        }
        Action::PropLeft
        | Action::PropRight
        | Action::PropUp
        | Action::PropDown
        | Action::PropFar
        | Action::PropNear
            if state.gui_enabled =>
        {
            let step = match action {
                Action::PropLeft => Vector3::new(-PROP_MOVE_STEP, 0.0, 0.0),
                Action::PropRight => Vector3::new(PROP_MOVE_STEP, 0.0, 0.0),
                Action::PropUp => Vector3::new(0.0, PROP_MOVE_STEP, 0.0),
                Action::PropDown => Vector3::new(0.0, -PROP_MOVE_STEP, 0.0),
                Action::PropFar => Vector3::new(0.0, 0.0, -PROP_MOVE_STEP),
                _ => Vector3::new(0.0, 0.0, PROP_MOVE_STEP),
            };
            state.prop_position += step;
        }
        // sliders without the GUI
        _ => {}
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn toggles_ignore_key_repeat() {
        assert_eq!(binding(KeyCode::KeyH, false, false), Some(Action::ToggleHdr));
        assert_eq!(binding(KeyCode::KeyH, true, false), None);
        assert_eq!(binding(KeyCode::KeyQ, true, false), Some(Action::ExposureDown));
        assert_eq!(binding(KeyCode::KeyW, false, false), None);
    }

    #[test]
    fn ctrl_turns_arrows_into_prop_moves() {
        assert_eq!(binding(KeyCode::ArrowUp, false, false), Some(Action::AmbientUp));
        assert_eq!(binding(KeyCode::ArrowUp, true, true), Some(Action::PropFar));
        assert_eq!(binding(KeyCode::ArrowLeft, false, true), Some(Action::PropLeft));
        assert_eq!(binding(KeyCode::PageUp, false, false), Some(Action::PropUp));
    }

    #[test]
    fn exposure_never_goes_negative() {
        let mut state = ProgramState::default();
        state.exposure = 0.005;
        apply(Action::ExposureDown, &mut state);
        assert_eq!(state.exposure, 0.0);
        apply(Action::ExposureUp, &mut state);
        assert_relative_eq!(state.exposure, 0.01);
    }

    #[test]
    fn gui_toggle_frees_cursor_and_stops_mouse_look() {
        let mut state = ProgramState::default();
        assert_eq!(apply(Action::ToggleGui, &mut state), Effect::CursorGrab(false));
        assert!(state.gui_enabled);
        assert!(!state.camera_mouse_movement_enabled);
        assert_eq!(apply(Action::ToggleGui, &mut state), Effect::CursorGrab(true));
        assert!(state.camera_mouse_movement_enabled);
    }

    #[test]
    fn camera_mouse_toggle_needs_gui() {
        let mut state = ProgramState::default();
        assert_eq!(apply(Action::ToggleCameraMouse, &mut state), Effect::None);
        assert!(state.camera_mouse_movement_enabled);

        apply(Action::ToggleGui, &mut state);
        assert_eq!(apply(Action::ToggleCameraMouse, &mut state), Effect::CursorGrab(true));
        assert!(state.camera_mouse_movement_enabled);
    }

    #[test]
    fn sliders_are_clamped_and_gui_only() {
        let mut state = ProgramState::default();
        apply(Action::AmbientUp, &mut state);
        assert_eq!(state.ambient_strength, 0.0);

        state.gui_enabled = true;
        apply(Action::AmbientDown, &mut state);
        assert_eq!(state.ambient_strength, 0.0);
        apply(Action::AmbientUp, &mut state);
        assert_relative_eq!(state.ambient_strength, 0.005);

        state.prop_scale = 3.98;
        apply(Action::PropScaleUp, &mut state);
        assert_eq!(state.prop_scale, 4.0);
    }
}
