use crate::pipelines::{
    Layouts,
    basic::{PipelineOptions, mk_pipeline_layout, mk_render_pipeline, replace_targets},
    forward::HDR_TARGETS,
};

/// The three g-buffer textures, read with `textureLoad`.
pub fn gbuffer_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let entries: Vec<_> = (0..3)
        .map(|binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
            },
            count: None,
        })
        .collect();
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &entries,
        label: Some("G-Buffer bind_group_layout"),
    })
}

pub fn mk_gbuffer_bind_group(
    device: &wgpu::Device,
    layouts: &Layouts,
    views: [&wgpu::TextureView; 3],
) -> wgpu::BindGroup {
    let entries: Vec<_> = views
        .iter()
        .enumerate()
        .map(|(binding, view)| wgpu::BindGroupEntry {
            binding: binding as u32,
            resource: wgpu::BindingResource::TextureView(view),
        })
        .collect();
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &layouts.gbuffer,
        entries: &entries,
        label: Some("G-Buffer Bind Group"),
    })
}

/// Full-screen lighting pass, no depth attachment.
pub fn mk_deferred_pipeline(device: &wgpu::Device, layouts: &Layouts) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Deferred Lighting Pipeline Layout",
        &[&layouts.gbuffer, &layouts.fragment_uniform],
    );
    mk_render_pipeline(
        device,
        &layout,
        wgpu::ShaderModuleDescriptor {
            label: Some("Deferred Lighting Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("deferred.wgsl").into()),
        },
        PipelineOptions {
            label: "Deferred Lighting Pipeline",
            targets: &replace_targets(&HDR_TARGETS),
            depth: None,
            vertex_layouts: &[],
            cull_mode: None,
            sample_count: 1,
        },
    )
}
