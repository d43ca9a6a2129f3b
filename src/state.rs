//! Program state shared by input handling, the renderer and the overlay.
//!
//! A subset of it survives restarts through a plain-text file holding one
//! value per line in a fixed order:
//!
//! ```text
//! clear.r clear.g clear.b
//! camera.position.x camera.position.y camera.position.z
//! camera.front.x camera.front.y camera.front.z
//! spotlight (1/0)
//! ambient strength
//! ```

use std::{fs, io, path::Path, str::FromStr};

use cgmath::{Point3, Vector3};
use thiserror::Error;

use crate::camera::Camera;

#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("could not access the state file: {0}")]
    Io(#[from] io::Error),
    #[error("state file ends before `{0}`")]
    MissingField(&'static str),
    #[error("`{field}` is not a number: {value:?}")]
    BadNumber { field: &'static str, value: String },
    #[error("`{field}` is not a boolean: {value:?}")]
    BadBool { field: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ProgramState {
    pub clear_color: [f32; 3],
    pub gui_enabled: bool,
    pub camera: Camera,
    pub camera_mouse_movement_enabled: bool,
    pub spotlight: bool,
    pub ambient_strength: f32,
    pub grayscale_enabled: bool,
    pub aa_enabled: bool,
    pub intro_complete: bool,
    pub keyboard_input_enabled: bool,
    pub mouse_input_enabled: bool,
    pub prop_position: Vector3<f32>,
    pub prop_scale: f32,
    pub prop_rotation: f32,
    pub hdr: bool,
    pub bloom: bool,
    pub exposure: f32,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self {
            clear_color: [0.0; 3],
            gui_enabled: false,
            camera: Camera::new((-0.8, 1.0, 120.0)),
            camera_mouse_movement_enabled: true,
            spotlight: true,
            ambient_strength: 0.0,
            grayscale_enabled: false,
            aa_enabled: true,
            intro_complete: false,
            keyboard_input_enabled: false,
            mouse_input_enabled: false,
            prop_position: Vector3::new(0.0, 2.0, -7.0),
            prop_scale: 1.0,
            prop_rotation: 0.0,
            hdr: true,
            bloom: true,
            exposure: 1.0,
        }
    }
}

impl ProgramState {
    /// Whether raw mouse motion should turn the camera this frame.
    pub fn mouse_look_active(&self) -> bool {
        self.mouse_input_enabled && self.camera_mouse_movement_enabled
    }

    pub fn to_file_contents(&self) -> String {
        let c = &self.camera;
        let values = [
            self.clear_color[0],
            self.clear_color[1],
            self.clear_color[2],
            c.position.x,
            c.position.y,
            c.position.z,
            c.front.x,
            c.front.y,
            c.front.z,
        ];
        let mut lines: Vec<String> = values.iter().map(f32::to_string).collect();
        lines.push(u8::from(self.spotlight).to_string());
        lines.push(self.ambient_strength.to_string());
        lines.join("\n") + "\n"
    }

    /// Overwrite the persisted fields from `contents`, leaving the rest untouched.
    ///
    /// Nothing is modified unless every field parses.
    pub fn apply_file_contents(&mut self, contents: &str) -> Result<(), StateFileError> {
        let mut tokens = contents.split_whitespace();
        let mut float = |field: &'static str| -> Result<f32, StateFileError> {
            let token = tokens.next().ok_or(StateFileError::MissingField(field))?;
            f32::from_str(token).map_err(|_| StateFileError::BadNumber {
                field,
                value: token.to_string(),
            })
        };

        let clear_color = [float("clear.r")?, float("clear.g")?, float("clear.b")?];
        let position = Point3::new(float("position.x")?, float("position.y")?, float("position.z")?);
        let front = Vector3::new(float("front.x")?, float("front.y")?, float("front.z")?);
        drop(float);

        let spotlight = match tokens.next() {
            None => return Err(StateFileError::MissingField("spotlight")),
            Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            Some(other) => {
                return Err(StateFileError::BadBool {
                    field: "spotlight",
                    value: other.to_string(),
                });
            }
        };
        let ambient_token = tokens
            .next()
            .ok_or(StateFileError::MissingField("ambient"))?;
        let ambient_strength =
            f32::from_str(ambient_token).map_err(|_| StateFileError::BadNumber {
                field: "ambient",
                value: ambient_token.to_string(),
            })?;

        self.clear_color = clear_color;
        self.camera.position = position;
        self.camera.set_front(front);
        self.spotlight = spotlight;
        self.ambient_strength = ambient_strength;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StateFileError> {
        fs::write(path, self.to_file_contents())?;
        Ok(())
    }

    /// Returns `Ok(false)` when there is no file yet.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<bool, StateFileError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        self.apply_file_contents(&contents)?;
        Ok(true)
    }

    /// Defaults overlaid with whatever the state file provides.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut state = Self::default();
        match state.load(path) {
            Ok(true) => log::info!("Restored program state from {}", path.display()),
            Ok(false) => log::info!("No saved state at {}, using defaults", path.display()),
            Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn writes_eleven_lines_in_fixed_order() {
        let mut state = ProgramState::default();
        state.clear_color = [0.1, 0.2, 0.3];
        state.spotlight = false;
        state.ambient_strength = 0.25;
        let contents = state.to_file_contents();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "0.1");
        assert_eq!(lines[3], "-0.8");
        assert_eq!(lines[5], "120");
        assert_eq!(lines[9], "0");
        assert_eq!(lines[10], "0.25");
        assert!(contents.ends_with("0.25\n"));
    }

    #[test]
    fn parses_whitespace_separated_values() {
        let mut state = ProgramState::default();
        state
            .apply_file_contents("0 0 0  1 2 3\t0 0 -1 1 0.5 trailing tokens")
            .unwrap();
        assert_eq!(state.camera.position, Point3::new(1.0, 2.0, 3.0));
        assert!(state.spotlight);
        assert_relative_eq!(state.ambient_strength, 0.5);
        assert_relative_eq!(state.camera.yaw, -90.0, epsilon = 1e-4);
    }

    #[test]
    fn truncated_file_leaves_state_untouched() {
        let mut state = ProgramState::default();
        let err = state.apply_file_contents("0 0 0 5 5 5").unwrap_err();
        assert!(matches!(err, StateFileError::MissingField("front.x")));
        assert_eq!(state.camera.position, Point3::new(-0.8, 1.0, 120.0));
    }

    #[test]
    fn rejects_garbage() {
        let mut state = ProgramState::default();
        let err = state
            .apply_file_contents("0 0 0 1 2 3 0 0 -1 maybe 0")
            .unwrap_err();
        assert!(matches!(err, StateFileError::BadBool { field: "spotlight", .. }));

        let err = state.apply_file_contents("0 zero 0").unwrap_err();
        assert!(matches!(err, StateFileError::BadNumber { field: "clear.g", .. }));
    }

    #[test]
    fn mouse_look_needs_both_flags() {
        let mut state = ProgramState::default();
        assert!(!state.mouse_look_active());
        state.mouse_input_enabled = true;
        assert!(state.mouse_look_active());
        state.camera_mouse_movement_enabled = false;
        assert!(!state.mouse_look_active());
    }
}
