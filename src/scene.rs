//! The fixed street scene: every model, where it stands and when it is drawn.

use cgmath::{Deg, EuclideanSpace, Quaternion, Rotation3, Vector3};
use futures::future::join_all;
use wgpu::util::DeviceExt;

use crate::{
    camera::Camera,
    data_structures::{
        instance::{Instance, InstanceBuffer},
        model::Model,
        primitives,
    },
    lights::{LAMP_SPACING, LampLights},
    pipelines::{Layouts, light_box::LightBoxColor, skybox::mk_skybox_bind_group},
    resources::{
        load_model_or_empty,
        texture::{load_cube_map, load_material},
    },
    state::ProgramState,
};

const ROAD_COUNT: usize = 4;
const ROAD_SPACING: f32 = 31.68;
const LIGHT_BOX_SCALE: Vector3<f32> = Vector3::new(0.35, 0.1, 0.30);
const FLASHLIGHT_MODEL_OFFSET: [f32; 3] = [0.35, 0.07, -0.12];
const FLASHLIGHT_SCALE: f32 = 0.025;

/// Tufts of tall grass around the crossing.
pub const VEGETATION: [[f32; 3]; 8] = [
    [-1.5, 0.5, -0.48],
    [1.5, 0.5, 0.51],
    [0.0, 0.5, 0.7],
    [-0.7, 0.5, -2.3],
    [1.0, 0.5, -1.2],
    [-0.1, 0.5, -0.63],
    [-1.75, 0.5, 1.0],
    [-0.6, 0.5, -2.0],
];

/// The obj models, loaded from `objects/<name>/<name>.obj`.
const MODEL_NAMES: [&str; 8] = [
    "street_lamp",
    "road",
    "fence",
    "car",
    "house",
    "cottage",
    "flashlight",
    "zombie",
];

/// Every lit, textured object of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Lamps,
    Roads,
    Fence,
    Car,
    House,
    Cottage,
    Grass,
    Floor,
    Prop,
    Flashlight,
}

impl Part {
    /// Lit by the lamps through the g-buffer while the intro runs.
    pub const DEFERRED: [Part; 3] = [Part::Lamps, Part::Floor, Part::Roads];

    const INTRO_FORWARD: [Part; 5] = [Part::Prop, Part::Fence, Part::House, Part::Cottage, Part::Grass];

    const FORWARD: [Part; 10] = [
        Part::Prop,
        Part::Flashlight,
        Part::Car,
        Part::Fence,
        Part::House,
        Part::Cottage,
        Part::Grass,
        Part::Roads,
        Part::Lamps,
        Part::Floor,
    ];

    /// Parts drawn by the forward pass, in draw order.
    pub fn forward(intro_complete: bool) -> &'static [Part] {
        if intro_complete {
            &Self::FORWARD
        } else {
            &Self::INTRO_FORWARD
        }
    }

    pub fn double_sided(self) -> bool {
        matches!(self, Part::House | Part::Cottage | Part::Grass | Part::Floor)
    }
}

/// A model and the instances it is drawn with.
#[derive(Debug)]
pub struct SceneObject {
    pub model: Model,
    pub instances: InstanceBuffer,
}

impl SceneObject {
    fn new(device: &wgpu::Device, name: &str, model: Model, instances: Vec<Instance>) -> Self {
        let instances = InstanceBuffer::new(device, &format!("{name} instances"), instances);
        Self { model, instances }
    }
}

/// Emissive cubes marking the lamp bulbs.
pub struct LightBoxes {
    pub cube: Model,
    pub instances: InstanceBuffer,
    pub colors: wgpu::Buffer,
}

pub struct Skybox {
    pub cube: Model,
    pub bind_group: wgpu::BindGroup,
}

pub struct Scene {
    pub lamp_lights: LampLights,
    pub light_boxes: LightBoxes,
    pub skybox: Skybox,
    lamps: SceneObject,
    roads: SceneObject,
    fence: SceneObject,
    car: SceneObject,
    house: SceneObject,
    cottage: SceneObject,
    grass: SceneObject,
    floor: SceneObject,
    prop: SceneObject,
    flashlight: SceneObject,
}

pub fn lamp_instances() -> Vec<Instance> {
    (0..crate::lights::NUM_LAMPS)
        .map(|i| Instance::placed(Vector3::new(-4.0, 0.0, i as f32 * LAMP_SPACING), 0.0, 0.5))
        .collect()
}

pub fn road_instances() -> Vec<Instance> {
    (0..ROAD_COUNT)
        .map(|i| Instance::placed(Vector3::new(-0.2, -1.0, 11.0 + i as f32 * ROAD_SPACING), 90.0, 1.0))
        .collect()
}

pub fn prop_instance(state: &ProgramState) -> Instance {
    Instance::placed(state.prop_position, state.prop_rotation, state.prop_scale)
}

/// The flashlight model held just below and right of the view, turned with
/// the camera.
pub fn flashlight_instance(camera: &Camera) -> Instance {
    let [front, right, up] = FLASHLIGHT_MODEL_OFFSET;
    let position = camera.position.to_vec() + camera.front * front + camera.right * right + camera.up * up;
    let rotation = Quaternion::from_axis_angle(camera.up, Deg(-(camera.yaw + 180.0)))
        * Quaternion::from_axis_angle(camera.right, Deg(camera.pitch));
    Instance {
        position,
        rotation,
        scale: Vector3::new(FLASHLIGHT_SCALE, FLASHLIGHT_SCALE, FLASHLIGHT_SCALE),
    }
}

pub fn light_box_instances(lamps: &LampLights) -> Vec<Instance> {
    lamps
        .positions
        .iter()
        .map(|&position| Instance::from(position).with_scale(LIGHT_BOX_SCALE))
        .collect()
}

impl Scene {
    /// Loads every asset concurrently. Missing files are logged and replaced
    /// by empty models or plain textures.
    pub async fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &Layouts,
        state: &ProgramState,
    ) -> Self {
        let model_paths: Vec<String> = MODEL_NAMES
            .iter()
            .map(|name| format!("objects/{name}/{name}.obj"))
            .collect();
        let models = join_all(
            model_paths
                .iter()
                .map(|path| load_model_or_empty(path, device, queue, &layouts.material)),
        );
        let floor_material = load_material(
            "floor",
            "textures/grass_diffuse.png",
            Some("textures/grass_specular.png"),
            device,
            queue,
            &layouts.material,
        );
        let grass_material = load_material("grass", "textures/grass.png", None, device, queue, &layouts.material);
        let sky = load_cube_map("skybox", device, queue);
        let (models, floor_material, grass_material, sky) =
            futures::join!(models, floor_material, grass_material, sky);

        let mut models = models.into_iter();
        let mut next = || models.next().unwrap_or_default();
        let (lamp, road, fence, car, house, cottage, flashlight, prop) =
            (next(), next(), next(), next(), next(), next(), next(), next());

        let lamp_lights = LampLights::default();
        let colors: Vec<LightBoxColor> = lamp_lights
            .colors
            .iter()
            .map(|c| LightBoxColor {
                color: c.extend(1.0).into(),
            })
            .collect();
        let light_boxes = LightBoxes {
            cube: primitives::model_from(device, "light box", primitives::cube(), None),
            instances: InstanceBuffer::new(device, "light box instances", light_box_instances(&lamp_lights)),
            colors: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("light box colors"),
                contents: bytemuck::cast_slice(&colors),
                usage: wgpu::BufferUsages::VERTEX,
            }),
        };
        let skybox = Skybox {
            cube: primitives::model_from(device, "skybox", primitives::cube(), None),
            bind_group: mk_skybox_bind_group(device, layouts, &sky),
        };
        log::info!("Scene loaded");

        Self {
            lamp_lights,
            light_boxes,
            skybox,
            lamps: SceneObject::new(device, "lamps", lamp, lamp_instances()),
            roads: SceneObject::new(device, "roads", road, road_instances()),
            fence: SceneObject::new(
                device,
                "fence",
                fence,
                vec![Instance::placed(Vector3::new(-0.69, 0.15, -4.0), 90.0, 0.25)],
            ),
            car: SceneObject::new(
                device,
                "car",
                car,
                vec![Instance::placed(Vector3::new(0.4, 0.2, 1.0), -90.0, 0.85)],
            ),
            house: SceneObject::new(
                device,
                "house",
                house,
                vec![Instance::placed(Vector3::new(-20.0, 0.01, -20.0), 0.0, 0.7)],
            ),
            cottage: SceneObject::new(
                device,
                "cottage",
                cottage,
                vec![Instance::placed(Vector3::new(25.0, 0.0, 25.0), 0.0, 0.3)],
            ),
            grass: SceneObject::new(
                device,
                "grass",
                primitives::model_from(device, "grass", primitives::grass_quad(), Some(grass_material)),
                VEGETATION.iter().map(|&p| Instance::from(Vector3::from(p))).collect(),
            ),
            floor: SceneObject::new(
                device,
                "floor",
                primitives::model_from(device, "floor", primitives::floor(), Some(floor_material)),
                vec![Instance::new()],
            ),
            prop: SceneObject::new(device, "prop", prop, vec![prop_instance(state)]),
            flashlight: SceneObject::new(device, "flashlight", flashlight, vec![flashlight_instance(&state.camera)]),
        }
    }

    pub fn object(&self, part: Part) -> &SceneObject {
        match part {
            Part::Lamps => &self.lamps,
            Part::Roads => &self.roads,
            Part::Fence => &self.fence,
            Part::Car => &self.car,
            Part::House => &self.house,
            Part::Cottage => &self.cottage,
            Part::Grass => &self.grass,
            Part::Floor => &self.floor,
            Part::Prop => &self.prop,
            Part::Flashlight => &self.flashlight,
        }
    }

    /// Follows the prop settings and the camera.
    pub fn update(&mut self, queue: &wgpu::Queue, state: &ProgramState) {
        self.prop.instances.write(queue, vec![prop_instance(state)]);
        self.flashlight
            .instances
            .write(queue, vec![flashlight_instance(&state.camera)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Point3, Rotation};

    #[test]
    fn intro_hides_car_and_flashlight() {
        let intro = Part::forward(false);
        assert!(!intro.contains(&Part::Car));
        assert!(!intro.contains(&Part::Flashlight));
        for part in Part::DEFERRED {
            assert!(!intro.contains(&part), "{part:?} is drawn twice during the intro");
        }
        let free = Part::forward(true);
        assert!(free.contains(&Part::Car) && free.contains(&Part::Flashlight));
        assert!(Part::DEFERRED.iter().all(|p| free.contains(p)));
    }

    #[test]
    fn roads_line_up_along_the_lamps() {
        let roads = road_instances();
        assert_eq!(roads.len(), ROAD_COUNT);
        assert!((roads[3].position.z - 106.04).abs() < 1e-4);
        let lamps = lamp_instances();
        assert_eq!(lamps.len(), crate::lights::NUM_LAMPS);
        assert_eq!(lamps[9].position, Vector3::new(-4.0, 0.0, 108.0));
    }

    #[test]
    fn flashlight_follows_the_camera() {
        let camera = Camera::new(Point3::new(1.0, 2.0, 3.0));
        let instance = flashlight_instance(&camera);
        let expected = Vector3::new(1.07, 1.88, 2.65);
        assert!((instance.position - expected).magnitude() < 1e-5, "{:?}", instance.position);
        // the default yaw of -90 turns the model by -90 about +Y
        let turned = instance.rotation.rotate_vector(Vector3::unit_x());
        assert!((turned - Vector3::new(0.0, 0.0, 1.0)).magnitude() < 1e-5, "{turned:?}");
    }

    #[test]
    fn light_boxes_sit_on_the_bulbs() {
        let lamps = LampLights::default();
        let boxes = light_box_instances(&lamps);
        assert_eq!(boxes.len(), lamps.positions.len());
        assert_eq!(boxes[2].position, lamps.positions[2]);
        assert_eq!(boxes[2].scale, LIGHT_BOX_SCALE);
    }
}
