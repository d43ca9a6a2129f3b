use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
    },
    pipelines::{
        Layouts,
        basic::{DepthOptions, PipelineOptions, mk_pipeline_layout, mk_render_pipeline, replace_targets},
        forward::HDR_TARGETS,
    },
};

/// Per-instance colour of a light box, read at location 12.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightBoxColor {
    pub color: [f32; 4],
}

impl Vertex for LightBoxColor {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![12 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LightBoxColor>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

pub fn mk_light_box_pipeline(device: &wgpu::Device, layouts: &Layouts) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(device, "Light Box Pipeline Layout", &[&layouts.camera]);
    mk_render_pipeline(
        device,
        &layout,
        wgpu::ShaderModuleDescriptor {
            label: Some("Light Box Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("light_box.wgsl").into()),
        },
        PipelineOptions {
            label: "Light Box Pipeline",
            targets: &replace_targets(&HDR_TARGETS),
            depth: Some(DepthOptions::OPAQUE),
            vertex_layouts: &[ModelVertex::desc(), InstanceRaw::desc(), LightBoxColor::desc()],
            cull_mode: Some(wgpu::Face::Back),
            sample_count: 1,
        },
    )
}
