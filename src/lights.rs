//! Light sources of the scene and their uniform layouts.
//!
//! The street lamps are only lit through the deferred pass during the intro.
//! The forward pass uses a fixed set of three lights: a dim directional
//! light, a point light and the flashlight carried by the camera.

use cgmath::{EuclideanSpace, Vector3};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::camera::Camera;
use crate::state::ProgramState;

pub const NUM_LAMPS: usize = 10;
pub const LAMP_SEED: u64 = 13;
pub const LAMP_SPACING: f32 = 12.0;

const LAMP_ATTENUATION: [f32; 3] = [1.0, 0.06, 0.032];
const FORWARD_ATTENUATION: [f32; 3] = [1.0, 0.09, 0.032];
const SHININESS: f32 = 32.0;

/// Where the flashlight sits relative to the camera (front, right, up).
pub const FLASHLIGHT_LIGHT_OFFSET: [f32; 3] = [0.35, 0.07, -0.08];

/// One light as the shaders see it. Every field is padded to a `vec4`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    /// Tint applied on top of the ambient, diffuse and specular terms.
    pub color: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic
    pub attenuation: [f32; 4],
    /// cos of the inner and outer cone angles
    pub cone: [f32; 4],
}

fn vec4(v: Vector3<f32>) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

fn splat(value: f32) -> [f32; 4] {
    [value, value, value, 0.0]
}

fn attenuation([c, l, q]: [f32; 3]) -> [f32; 4] {
    [c, l, q, 0.0]
}

/// Camera position with the material shininess in `w`.
fn view_position(camera: &Camera) -> [f32; 4] {
    let p = camera.position;
    [p.x, p.y, p.z, SHININESS]
}

fn cone(inner: f32, outer: f32) -> [f32; 4] {
    [inner.to_radians().cos(), outer.to_radians().cos(), 0.0, 0.0]
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LampLightsUniform {
    pub lights: [LightRaw; NUM_LAMPS],
    pub view_position: [f32; 4],
}

/// Street lamp bulbs. Positions and base colours never change.
#[derive(Debug, Clone)]
pub struct LampLights {
    pub positions: Vec<Vector3<f32>>,
    pub colors: Vec<Vector3<f32>>,
}

impl LampLights {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut channel = || (rng.r#gen::<u32>() % 100) as f32 / 200.0 + 0.1;
        let positions = (0..count)
            .map(|i| Vector3::new(-0.35, 6.55, i as f32 * LAMP_SPACING))
            .collect();
        let colors = (0..count)
            .map(|_| Vector3::new(channel(), channel(), channel()))
            .collect();
        Self { positions, colors }
    }

    /// Colour and cone of every lamp at `time` seconds.
    pub fn uniform(&self, time: f32, camera: &Camera) -> LampLightsUniform {
        let mut lights = [LightRaw::default(); NUM_LAMPS];
        let inner = 15.0 + (time.sin() / 2.0 + 0.5) * 3.0;
        let outer = 25.0 + (time.cos() / 2.0 + 0.5) * 5.0;
        for (raw, (position, color)) in lights
            .iter_mut()
            .zip(self.positions.iter().zip(&self.colors))
        {
            let animated = color.map(|c| (time * c).sin() / 2.0 + 0.5);
            *raw = LightRaw {
                position: vec4(*position),
                direction: [0.0, -1.0, 0.0, 0.0],
                color: vec4(animated),
                ambient: splat(0.01),
                diffuse: splat(1.0),
                specular: splat(1.0),
                attenuation: attenuation(LAMP_ATTENUATION),
                cone: cone(inner, outer),
            };
        }
        LampLightsUniform {
            lights,
            view_position: view_position(camera),
        }
    }
}

impl Default for LampLights {
    fn default() -> Self {
        Self::new(NUM_LAMPS, LAMP_SEED)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ForwardLightsUniform {
    pub directional: LightRaw,
    pub point: LightRaw,
    pub flashlight: LightRaw,
    /// xyz camera position, w material shininess
    pub view_position: [f32; 4],
}

pub struct ForwardLights;

impl ForwardLights {
    pub const POINT_POSITION: Vector3<f32> = Vector3::new(-5.0, 4.0, -5.0);

    pub fn flashlight_position(camera: &Camera) -> Vector3<f32> {
        let [front, right, up] = FLASHLIGHT_LIGHT_OFFSET;
        camera.position.to_vec() + camera.front * front + camera.right * right + camera.up * up
    }

    pub fn uniform(state: &ProgramState) -> ForwardLightsUniform {
        let camera = &state.camera;
        let directional = LightRaw {
            direction: [-0.2, -1.0, -0.3, 0.0],
            color: splat(1.0),
            ambient: splat(state.ambient_strength),
            diffuse: splat(0.05),
            specular: splat(0.2),
            ..Default::default()
        };
        let point = LightRaw {
            position: vec4(Self::POINT_POSITION),
            color: splat(1.0),
            ambient: splat(1.0),
            diffuse: splat(0.05),
            specular: splat(0.2),
            attenuation: attenuation(FORWARD_ATTENUATION),
            ..Default::default()
        };
        let (diffuse, specular) = if state.spotlight { (5.0, 1.0) } else { (0.0, 0.0) };
        let flashlight = LightRaw {
            position: vec4(Self::flashlight_position(camera)),
            direction: vec4(camera.front),
            color: splat(1.0),
            ambient: splat(0.0),
            diffuse: splat(diffuse),
            specular: splat(specular),
            attenuation: attenuation(FORWARD_ATTENUATION),
            cone: cone(10.0, 15.0),
        };
        ForwardLightsUniform {
            directional,
            point,
            flashlight,
            view_position: view_position(camera),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lamps_are_spaced_along_the_road() {
        let lamps = LampLights::default();
        assert_eq!(lamps.positions.len(), NUM_LAMPS);
        assert_eq!(lamps.positions[3], Vector3::new(-0.35, 6.55, 36.0));
    }

    #[test]
    fn lamp_colours_are_deterministic_and_in_range() {
        let a = LampLights::new(NUM_LAMPS, LAMP_SEED);
        let b = LampLights::new(NUM_LAMPS, LAMP_SEED);
        assert_eq!(a.colors, b.colors);
        for c in &a.colors {
            for channel in [c.x, c.y, c.z] {
                assert!((0.1..0.6).contains(&channel), "{channel}");
            }
        }
    }

    #[test]
    fn lamp_cones_breathe_with_time() {
        let lamps = LampLights::default();
        let camera = Camera::default();
        let at_zero = lamps.uniform(0.0, &camera);
        let light = at_zero.lights[0];
        assert_relative_eq!(light.cone[0], 16.5f32.to_radians().cos(), epsilon = 1e-6);
        assert_relative_eq!(light.cone[1], 30.0f32.to_radians().cos(), epsilon = 1e-6);
        // sin(0) / 2 + 0.5
        assert_relative_eq!(light.color[0], 0.5);
        assert_eq!(light.direction, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(at_zero.view_position, [0.0, 0.0, 3.0, SHININESS]);
    }

    #[test]
    fn lamp_colour_is_kept_apart_from_the_light_terms() {
        let lamps = LampLights::default();
        let uniform = lamps.uniform(1.0, &Camera::default());
        for (raw, base) in uniform.lights.iter().zip(&lamps.colors) {
            assert_relative_eq!(raw.color[0], base.x.sin() / 2.0 + 0.5, epsilon = 1e-6);
            assert_eq!(raw.ambient, [0.01, 0.01, 0.01, 0.0]);
            assert_eq!(raw.diffuse, [1.0, 1.0, 1.0, 0.0]);
            assert_eq!(raw.specular, [1.0, 1.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn flashlight_follows_spotlight_toggle() {
        let mut state = ProgramState::default();
        state.camera = Camera::default();
        let on = ForwardLights::uniform(&state);
        assert_eq!(on.flashlight.diffuse[0], 5.0);
        assert_relative_eq!(on.flashlight.position[2], 3.0 - 0.35, epsilon = 1e-5);
        assert_relative_eq!(on.flashlight.position[0], 0.07, epsilon = 1e-5);
        assert_eq!(on.view_position[3], SHININESS);

        state.spotlight = false;
        let off = ForwardLights::uniform(&state);
        assert_eq!(off.flashlight.diffuse, [0.0; 4]);
        assert_eq!(off.flashlight.specular, [0.0; 4]);
    }

    #[test]
    fn directional_ambient_tracks_state() {
        let mut state = ProgramState::default();
        state.ambient_strength = 0.4;
        assert_eq!(ForwardLights::uniform(&state).directional.ambient, [0.4, 0.4, 0.4, 0.0]);
    }
}
