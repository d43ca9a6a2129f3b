use crate::{
    data_structures::texture::Texture,
    pipelines::{
        Layouts,
        basic::{PipelineOptions, mk_pipeline_layout, mk_render_pipeline, replace_targets},
    },
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurParams {
    pub direction: [f32; 2],
    _padding: [f32; 2],
}

impl BlurParams {
    pub fn new(horizontal: bool) -> Self {
        let direction = if horizontal { [1.0, 0.0] } else { [0.0, 1.0] };
        Self {
            direction,
            _padding: [0.0; 2],
        }
    }
}

pub fn mk_blur_pipeline(device: &wgpu::Device, layouts: &Layouts) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Blur Pipeline Layout",
        &[&layouts.one_texture, &layouts.fragment_uniform],
    );
    mk_render_pipeline(
        device,
        &layout,
        wgpu::ShaderModuleDescriptor {
            label: Some("Blur Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("blur.wgsl").into()),
        },
        PipelineOptions {
            label: "Blur Pipeline",
            targets: &replace_targets(&[Texture::HDR_FORMAT]),
            depth: None,
            vertex_layouts: &[],
            cull_mode: None,
            sample_count: 1,
        },
    )
}
