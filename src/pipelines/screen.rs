use crate::pipelines::{
    Layouts,
    basic::{PipelineOptions, mk_pipeline_layout, mk_render_pipeline, replace_targets},
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenSettings {
    pub grayscale: u32,
    pub encode_srgb: u32,
    _padding: [u32; 2],
}

impl ScreenSettings {
    /// `output_format` decides whether the shader has to gamma-encode itself.
    pub fn new(grayscale: bool, output_format: wgpu::TextureFormat) -> Self {
        Self {
            grayscale: grayscale.into(),
            encode_srgb: (!output_format.is_srgb()).into(),
            _padding: [0; 2],
        }
    }
}

pub fn mk_screen_pipeline(
    device: &wgpu::Device,
    layouts: &Layouts,
    output_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Screen Pipeline Layout",
        &[&layouts.one_texture, &layouts.fragment_uniform],
    );
    mk_render_pipeline(
        device,
        &layout,
        wgpu::ShaderModuleDescriptor {
            label: Some("Screen Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("screen.wgsl").into()),
        },
        PipelineOptions {
            label: "Screen Pipeline",
            targets: &replace_targets(&[output_format]),
            depth: None,
            vertex_layouts: &[],
            cull_mode: None,
            sample_count: 1,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_only_for_linear_surfaces() {
        let srgb = ScreenSettings::new(false, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(srgb.encode_srgb, 0);
        let linear = ScreenSettings::new(true, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(linear.encode_srgb, 1);
        assert_eq!(linear.grayscale, 1);
    }
}
