use crate::{
    data_structures::texture::Texture,
    pipelines::{
        Layouts,
        basic::{PipelineOptions, mk_pipeline_layout, mk_render_pipeline, replace_targets},
    },
    state::ProgramState,
};

/// Tone-mapped frame before the screen pass. Kept at half-float so dark
/// gradients survive until the final encode.
pub const COMPOSITE_FORMAT: wgpu::TextureFormat = Texture::HDR_FORMAT;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeSettings {
    pub exposure: f32,
    pub hdr: u32,
    pub bloom: u32,
    _padding: u32,
}

impl CompositeSettings {
    pub fn new(hdr: bool, bloom: bool, exposure: f32) -> Self {
        Self {
            exposure,
            hdr: hdr.into(),
            bloom: bloom.into(),
            _padding: 0,
        }
    }
}

impl From<&ProgramState> for CompositeSettings {
    fn from(state: &ProgramState) -> Self {
        Self::new(state.hdr, state.bloom, state.exposure)
    }
}

pub fn mk_composite_pipeline(device: &wgpu::Device, layouts: &Layouts) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Composite Pipeline Layout",
        &[&layouts.two_textures, &layouts.fragment_uniform],
    );
    mk_render_pipeline(
        device,
        &layout,
        wgpu::ShaderModuleDescriptor {
            label: Some("Composite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("composite.wgsl").into()),
        },
        PipelineOptions {
            label: "Composite Pipeline",
            targets: &replace_targets(&[COMPOSITE_FORMAT]),
            depth: None,
            vertex_layouts: &[],
            cull_mode: None,
            sample_count: 1,
        },
    )
}
