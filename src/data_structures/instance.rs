//! Instance transformation data for GPU rendering.
//!
//! Per-instance data like position, rotation, and scale is stored as
//! GPU buffers and passed to shaders for multi-draw instancing.

use cgmath::{Deg, One, Rotation3};
use wgpu::util::DeviceExt;

use crate::data_structures::model;

/// Per-instance transformation: position, rotation (as quaternion), and scale.
///
/// Applied in the order scale, rotate, translate.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Create a new instance with identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Translate, turn about +Y by `yaw_deg` and scale uniformly.
    pub fn placed(position: cgmath::Vector3<f32>, yaw_deg: f32, scale: f32) -> Self {
        Self {
            position,
            rotation: cgmath::Quaternion::from_angle_y(Deg(yaw_deg)),
            scale: cgmath::Vector3::new(scale, scale, scale),
        }
    }

    pub fn with_scale(mut self, scale: cgmath::Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().into(),
            normal: cgmath::Matrix3::from(self.rotation).into(),
        }
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

/**
 * The model matrix takes up locations 5-8 (four vec4 columns), the normal
 * matrix locations 9-11 (three vec3 columns).
 */
impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Advance once per instance instead of once per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A set of instances and the vertex buffer mirroring them.
#[derive(Debug)]
pub struct InstanceBuffer {
    pub instances: Vec<Instance>,
    pub buffer: wgpu::Buffer,
}

impl InstanceBuffer {
    pub fn new(device: &wgpu::Device, label: &str, instances: Vec<Instance>) -> Self {
        let raw: Vec<InstanceRaw> = instances.iter().map(Instance::to_raw).collect();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&raw),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self { instances, buffer }
    }

    pub fn len(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Replace the instances in place. The count must not grow.
    pub fn write(&mut self, queue: &wgpu::Queue, instances: Vec<Instance>) {
        if instances.len() > self.instances.len() {
            log::warn!(
                "Instance buffer holds {} instances, refusing to write {}",
                self.instances.len(),
                instances.len()
            );
            return;
        }
        let raw: Vec<InstanceRaw> = instances.iter().map(Instance::to_raw).collect();
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&raw));
        self.instances = instances;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Vector4};

    fn transform(instance: &Instance, point: Vector3<f32>) -> Vector3<f32> {
        (instance.to_matrix() * Vector4::new(point.x, point.y, point.z, 1.0)).truncate()
    }

    #[test]
    fn scales_before_rotating_and_translating() {
        let instance = Instance::placed(Vector3::new(10.0, 0.0, 0.0), 90.0, 2.0);
        // +X scaled to 2, turned onto -Z, then moved
        let moved = transform(&instance, Vector3::unit_x());
        assert!((moved - Vector3::new(10.0, 0.0, -2.0)).magnitude() < 1e-5, "{moved:?}");
    }

    #[test]
    fn normal_matrix_ignores_scale() {
        let instance = Instance::placed(Vector3::new(0.0, 0.0, 0.0), 0.0, 0.25);
        let raw = instance.to_raw();
        assert_eq!(raw.normal, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(raw.model[0][0], 0.25);
    }

    #[test]
    fn from_position_keeps_identity_rotation() {
        let instance = Instance::from(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(instance.rotation, cgmath::Quaternion::one());
        assert_eq!(instance.scale, Vector3::new(1.0, 1.0, 1.0));
    }
}
