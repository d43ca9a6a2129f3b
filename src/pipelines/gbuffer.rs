use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
    },
    pipelines::{
        Layouts,
        basic::{DepthOptions, PipelineOptions, mk_pipeline_layout, mk_render_pipeline, replace_targets},
    },
};

/// World position, normal, albedo + specular intensity.
pub const GBUFFER_FORMATS: [wgpu::TextureFormat; 3] = [
    wgpu::TextureFormat::Rgba16Float,
    wgpu::TextureFormat::Rgba16Float,
    wgpu::TextureFormat::Rgba8Unorm,
];

pub fn mk_gbuffer_pipeline(device: &wgpu::Device, layouts: &Layouts) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "G-Buffer Pipeline Layout",
        &[&layouts.material, &layouts.camera],
    );
    mk_render_pipeline(
        device,
        &layout,
        wgpu::ShaderModuleDescriptor {
            label: Some("G-Buffer Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("gbuffer.wgsl").into()),
        },
        PipelineOptions {
            label: "G-Buffer Pipeline",
            targets: &replace_targets(&GBUFFER_FORMATS),
            depth: Some(DepthOptions::OPAQUE),
            vertex_layouts: &[ModelVertex::desc(), InstanceRaw::desc()],
            cull_mode: None,
            sample_count: 1,
        },
    )
}
