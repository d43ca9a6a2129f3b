use crate::{
    data_structures::model::{ModelVertex, Vertex},
    pipelines::{
        Layouts,
        basic::{DepthOptions, PipelineOptions, mk_pipeline_layout, mk_render_pipeline, replace_targets},
        forward::HDR_TARGETS,
    },
};

/// The sky is seen from inside the cube, so nothing is culled.
pub fn mk_skybox_pipeline(
    device: &wgpu::Device,
    layouts: &Layouts,
    sample_count: u32,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Skybox Pipeline Layout",
        &[&layouts.cube_map, &layouts.camera],
    );
    mk_render_pipeline(
        device,
        &layout,
        wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("skybox.wgsl").into()),
        },
        PipelineOptions {
            label: "Skybox Pipeline",
            targets: &replace_targets(&HDR_TARGETS),
            depth: Some(DepthOptions::BACKGROUND),
            vertex_layouts: &[ModelVertex::desc()],
            cull_mode: None,
            sample_count,
        },
    )
}

pub fn mk_skybox_bind_group(
    device: &wgpu::Device,
    layouts: &Layouts,
    cube_map: &crate::data_structures::texture::Texture,
) -> wgpu::BindGroup {
    let fallback;
    let sampler = match &cube_map.sampler {
        Some(sampler) => sampler,
        None => {
            fallback = crate::data_structures::texture::create_clamping_sampler(device);
            &fallback
        }
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &layouts.cube_map,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&cube_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("Skybox Bind Group"),
    })
}
