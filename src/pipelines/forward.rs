use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::{
        Layouts,
        basic::{DepthOptions, PipelineOptions, mk_pipeline_layout, mk_render_pipeline, replace_targets},
    },
};

/// Scene colour and its bright part, the two targets every lit pass writes.
pub const HDR_TARGETS: [wgpu::TextureFormat; 2] = [Texture::HDR_FORMAT, Texture::HDR_FORMAT];

/// Lit, textured models for one sample count.
pub struct ForwardPipelines {
    pub single_sided: wgpu::RenderPipeline,
    /// No culling, for foliage, planes and the buildings with open geometry.
    pub double_sided: wgpu::RenderPipeline,
}

impl ForwardPipelines {
    pub fn new(device: &wgpu::Device, layouts: &Layouts, sample_count: u32) -> Self {
        let layout = mk_pipeline_layout(
            device,
            "Forward Pipeline Layout",
            &[&layouts.material, &layouts.camera, &layouts.fragment_uniform],
        );
        let targets = replace_targets(&HDR_TARGETS);
        let build = |cull_mode, label| {
            mk_render_pipeline(
                device,
                &layout,
                wgpu::ShaderModuleDescriptor {
                    label: Some("Forward Shader"),
                    source: wgpu::ShaderSource::Wgsl(include_str!("forward.wgsl").into()),
                },
                PipelineOptions {
                    label,
                    targets: &targets,
                    depth: Some(DepthOptions::OPAQUE),
                    vertex_layouts: &[ModelVertex::desc(), InstanceRaw::desc()],
                    cull_mode,
                    sample_count,
                },
            )
        };
        Self {
            single_sided: build(Some(wgpu::Face::Back), "Forward Pipeline"),
            double_sided: build(None, "Forward Double Sided Pipeline"),
        }
    }

    pub fn get(&self, double_sided: bool) -> &wgpu::RenderPipeline {
        if double_sided {
            &self.double_sided
        } else {
            &self.single_sided
        }
    }
}
