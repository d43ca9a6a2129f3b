//! Fly camera, its keyboard/mouse controller and the GPU-side uniform.
//!
//! Angles are kept in degrees on the CPU side because the state file and the
//! overlay report them that way.

use cgmath::{EuclideanSpace, InnerSpace, Matrix3, Matrix4, Point3, Rad, Vector3};
use instant::Duration;
use winit::keyboard::KeyCode;

use crate::config::{Z_FAR, Z_NEAR};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const YAW: f32 = -90.0;
const PITCH: f32 = 0.0;
const SPEED: f32 = 2.5;
const SENSITIVITY: f32 = 0.1;
const ZOOM: f32 = 45.0;
const PITCH_LIMIT: f32 = 89.0;

/// The six directions the movement keys map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub front: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
    pub world_up: Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom: f32,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        let mut camera = Self {
            position: position.into(),
            front: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            right: Vector3::unit_x(),
            world_up: Vector3::unit_y(),
            yaw: YAW,
            pitch: PITCH,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            zoom: ZOOM,
        };
        camera.update_camera_vectors();
        camera
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front, self.up)
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: Duration) {
        let velocity = self.movement_speed * dt.as_secs_f32();
        let offset = match direction {
            CameraMovement::Forward => self.front * velocity,
            CameraMovement::Backward => -self.front * velocity,
            CameraMovement::Left => -self.right * velocity,
            CameraMovement::Right => self.right * velocity,
            CameraMovement::Up => self.world_up * velocity,
            CameraMovement::Down => -self.world_up * velocity,
        };
        self.position += offset;
    }

    /// `dy` grows upwards, so callers feeding window coordinates must flip it.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        self.update_camera_vectors();
    }

    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(1.0, 45.0);
    }

    /// Put the camera back in front of the origin, looking down -Z.
    pub fn reset(&mut self) {
        self.position = Point3::new(0.0, 0.0, 3.0);
        self.yaw = YAW;
        self.pitch = PITCH;
        self.update_camera_vectors();
    }

    /// Re-derive yaw and pitch from a viewing direction.
    ///
    /// A zero vector leaves the orientation untouched.
    pub fn set_front(&mut self, front: Vector3<f32>) {
        if front.magnitude2() <= f32::EPSILON {
            return;
        }
        let front = front.normalize();
        self.pitch = front
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = front.z.atan2(front.x).to_degrees();
        self.update_camera_vectors();
    }

    /// Point the camera straight down -Z without touching its position.
    pub fn look_down_road(&mut self) {
        self.yaw = YAW;
        self.pitch = PITCH;
        self.update_camera_vectors();
    }

    fn update_camera_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new((0.0, 0.0, 3.0))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// `zoom` is the vertical field of view in degrees.
    pub fn calc_matrix(&self, zoom: f32) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * cgmath::perspective(Rad::from(cgmath::Deg(zoom)), self.aspect, Z_NEAR, Z_FAR)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    // Same projection without the view translation, used by the skybox.
    pub sky_view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_proj: Matrix4::identity().into(),
            sky_view_proj: Matrix4::identity().into(),
            view_position: [0.0; 4],
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        let proj = projection.calc_matrix(camera.zoom);
        let view = camera.view_matrix();
        let rotation_only = Matrix3::from_cols(view.x.truncate(), view.y.truncate(), view.z.truncate());
        self.view_proj = (proj * view).into();
        self.sky_view_proj = (proj * Matrix4::from(rotation_only)).into();
        self.view_position = camera.position.to_vec().extend(1.0).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU resources backing the camera uniform.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

/// Collects held movement keys and raw mouse input between frames.
#[derive(Debug, Default)]
pub struct CameraController {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    mouse_dx: f32,
    mouse_dy: f32,
    scroll: f32,
    skip_next_motion: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            skip_next_motion: true,
            ..Default::default()
        }
    }

    /// Returns whether the key is one of the movement keys.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let flag = match key {
            KeyCode::KeyW => &mut self.forward,
            KeyCode::KeyS => &mut self.backward,
            KeyCode::KeyA => &mut self.left,
            KeyCode::KeyD => &mut self.right,
            KeyCode::Space => &mut self.up,
            KeyCode::ShiftLeft => &mut self.down,
            _ => return false,
        };
        *flag = pressed;
        true
    }

    /// Raw motion in window coordinates (y grows downwards).
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if self.skip_next_motion {
            self.skip_next_motion = false;
            return;
        }
        self.mouse_dx += dx as f32;
        // reversed since window y-coordinates go from top to bottom
        self.mouse_dy -= dy as f32;
    }

    pub fn handle_scroll(&mut self, dy: f32) {
        self.scroll += dy;
    }

    /// Drop any buffered motion and ignore the next sample, e.g. after the
    /// cursor was grabbed again and the platform reports a jump.
    pub fn reset_mouse(&mut self) {
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        self.skip_next_motion = true;
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration, keyboard_enabled: bool, mouse_look_enabled: bool) {
        if keyboard_enabled {
            let held = [
                (self.forward, CameraMovement::Forward),
                (self.backward, CameraMovement::Backward),
                (self.left, CameraMovement::Left),
                (self.right, CameraMovement::Right),
                (self.up, CameraMovement::Up),
                (self.down, CameraMovement::Down),
            ];
            for (_, direction) in held.into_iter().filter(|(pressed, _)| *pressed) {
                camera.process_keyboard(direction, dt);
            }
        }

        if mouse_look_enabled {
            camera.process_mouse_movement(self.mouse_dx, self.mouse_dy, true);
        }
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;

        if self.scroll != 0.0 {
            camera.process_mouse_scroll(self.scroll);
            self.scroll = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_close(actual: Vector3<f32>, expected: Vector3<f32>) {
        assert!(
            (actual - expected).magnitude() < 1e-5,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert_close(camera.front, Vector3::new(0.0, 0.0, -1.0));
        assert_close(camera.right, Vector3::new(1.0, 0.0, 0.0));
        assert_close(camera.up, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn pitch_is_clamped_when_constrained() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch, 89.0);
        camera.process_mouse_movement(0.0, -20_000.0, true);
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn zoom_stays_within_limits() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom, 1.0);
        camera.process_mouse_scroll(-100.0);
        assert_eq!(camera.zoom, 45.0);
    }

    #[test]
    fn forward_moves_along_front() {
        let mut camera = Camera::default();
        camera.process_keyboard(CameraMovement::Forward, Duration::from_secs(2));
        assert_close(camera.position.to_vec(), Vector3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn set_front_recovers_yaw_and_pitch() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(300.0, 150.0, true);
        let front = camera.front;
        let (yaw, pitch) = (camera.yaw, camera.pitch);

        let mut restored = Camera::default();
        restored.set_front(front);
        assert_close(restored.front, front);
        assert_relative_eq!(restored.pitch, pitch, epsilon = 1e-3);
        // yaw is only recoverable modulo a full turn
        let turn = (restored.yaw - yaw).rem_euclid(360.0);
        assert!(turn < 1e-3 || (360.0 - turn) < 1e-3);
    }

    #[test]
    fn controller_skips_first_motion_and_flips_y() {
        let mut controller = CameraController::new();
        let mut camera = Camera::default();
        controller.handle_mouse(500.0, 500.0);
        controller.handle_mouse(0.0, -10.0);
        controller.update(&mut camera, Duration::ZERO, true, true);
        assert_relative_eq!(camera.pitch, 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.yaw, YAW, epsilon = 1e-5);
    }

    #[test]
    fn controller_ignores_keys_while_keyboard_disabled() {
        let mut controller = CameraController::new();
        let mut camera = Camera::default();
        assert!(controller.handle_key(KeyCode::KeyW, true));
        controller.update(&mut camera, Duration::from_secs(1), false, false);
        assert_close(camera.position.to_vec(), Vector3::new(0.0, 0.0, 3.0));
        assert!(!controller.handle_key(KeyCode::KeyQ, true));
    }
}
