//! Scripted flythrough shown on every launch.
//!
//! The camera rides along the road towards the origin with input disabled.
//! Once it passes z = 0 it is handed over to the player.

use cgmath::{Point3, Vector3};
use instant::Duration;

use crate::state::ProgramState;

pub const START_POSITION: Point3<f32> = Point3::new(-0.8, 1.0, 120.0);
/// Units per second along -Z.
pub const SPEED: f32 = 15.0;
/// Lane the camera is moved to when the player takes over.
pub const HANDOVER_X: f32 = -1.5;

#[derive(Debug, Default, Clone, Copy)]
pub struct Intro;

impl Intro {
    /// Reset the camera to the start of the road unless the intro already ran.
    pub fn start(state: &mut ProgramState) {
        if state.intro_complete {
            return;
        }
        state.keyboard_input_enabled = false;
        state.mouse_input_enabled = false;
        state.camera.position = START_POSITION;
        state.camera.world_up = Vector3::unit_y();
        state.camera.look_down_road();
    }

    /// Returns true on the frame the intro finishes.
    pub fn advance(state: &mut ProgramState, dt: Duration) -> bool {
        if state.intro_complete {
            return false;
        }
        state.camera.position.z -= SPEED * dt.as_secs_f32();
        if state.camera.position.z >= 0.0 {
            return false;
        }
        state.camera.position.x = HANDOVER_X;
        state.keyboard_input_enabled = true;
        state.mouse_input_enabled = true;
        state.intro_complete = true;
        log::info!("Intro finished, input enabled");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_resets_camera_and_disables_input() {
        let mut state = ProgramState::default();
        state.camera.position = Point3::new(3.0, 3.0, 3.0);
        state.keyboard_input_enabled = true;
        Intro::start(&mut state);
        assert_eq!(state.camera.position, START_POSITION);
        assert!(!state.keyboard_input_enabled);
        assert!((state.camera.front.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn completes_once_past_the_origin() {
        let mut state = ProgramState::default();
        Intro::start(&mut state);
        assert!(!Intro::advance(&mut state, Duration::from_secs(7)));
        assert!(state.camera.position.z > 0.0);
        assert!(!state.mouse_input_enabled);

        assert!(Intro::advance(&mut state, Duration::from_secs(1)));
        assert!(state.intro_complete);
        assert_eq!(state.camera.position.x, HANDOVER_X);
        assert!(state.keyboard_input_enabled && state.mouse_input_enabled);

        let z = state.camera.position.z;
        assert!(!Intro::advance(&mut state, Duration::from_secs(1)));
        assert_eq!(state.camera.position.z, z);
    }
}
