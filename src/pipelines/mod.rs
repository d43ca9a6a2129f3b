//! Render pipelines and the bind group layouts they share.
//!
//! Every pipeline goes through [`basic::mk_render_pipeline`]. Bind group
//! slots follow one convention: textured passes take the material at group 0,
//! the camera at group 1 and their light uniform at group 2; screen-space
//! passes take their input textures at group 0 and settings at group 1.

pub mod basic;
pub mod blur;
pub mod composite;
pub mod deferred;
pub mod forward;
pub mod gbuffer;
pub mod light_box;
pub mod screen;
pub mod skybox;

use crate::{config::MSAA_SAMPLES, resources::texture::{cube_map_layout, diffuse_specular_layout}};

#[derive(Debug)]
pub struct Layouts {
    pub material: wgpu::BindGroupLayout,
    pub camera: wgpu::BindGroupLayout,
    /// A single uniform read by fragment shaders (lights, post settings).
    pub fragment_uniform: wgpu::BindGroupLayout,
    pub cube_map: wgpu::BindGroupLayout,
    pub gbuffer: wgpu::BindGroupLayout,
    pub one_texture: wgpu::BindGroupLayout,
    pub two_textures: wgpu::BindGroupLayout,
}

impl Layouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            material: diffuse_specular_layout(device),
            camera: basic::uniform_layout(
                device,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                "camera_bind_group_layout",
            ),
            fragment_uniform: basic::uniform_layout(
                device,
                wgpu::ShaderStages::FRAGMENT,
                "fragment_uniform_bind_group_layout",
            ),
            cube_map: cube_map_layout(device),
            gbuffer: deferred::gbuffer_layout(device),
            one_texture: basic::screen_textures_layout(device, 1, "one_texture_bind_group_layout"),
            two_textures: basic::screen_textures_layout(device, 2, "two_textures_bind_group_layout"),
        }
    }
}

pub struct Pipelines {
    pub forward: forward::ForwardPipelines,
    pub forward_msaa: forward::ForwardPipelines,
    pub skybox: wgpu::RenderPipeline,
    pub skybox_msaa: wgpu::RenderPipeline,
    pub gbuffer: wgpu::RenderPipeline,
    pub deferred: wgpu::RenderPipeline,
    pub light_box: wgpu::RenderPipeline,
    pub blur: wgpu::RenderPipeline,
    pub composite: wgpu::RenderPipeline,
    pub screen: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(device: &wgpu::Device, layouts: &Layouts, output_format: wgpu::TextureFormat) -> Self {
        Self {
            forward: forward::ForwardPipelines::new(device, layouts, 1),
            forward_msaa: forward::ForwardPipelines::new(device, layouts, MSAA_SAMPLES),
            skybox: skybox::mk_skybox_pipeline(device, layouts, 1),
            skybox_msaa: skybox::mk_skybox_pipeline(device, layouts, MSAA_SAMPLES),
            gbuffer: gbuffer::mk_gbuffer_pipeline(device, layouts),
            deferred: deferred::mk_deferred_pipeline(device, layouts),
            light_box: light_box::mk_light_box_pipeline(device, layouts),
            blur: blur::mk_blur_pipeline(device, layouts),
            composite: composite::mk_composite_pipeline(device, layouts),
            screen: screen::mk_screen_pipeline(device, layouts, output_format),
        }
    }

    pub fn forward(&self, msaa: bool) -> &forward::ForwardPipelines {
        if msaa { &self.forward_msaa } else { &self.forward }
    }

    pub fn skybox(&self, msaa: bool) -> &wgpu::RenderPipeline {
        if msaa { &self.skybox_msaa } else { &self.skybox }
    }
}
