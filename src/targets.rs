//! Every off-screen texture a frame renders into. All of them follow the
//! window size, so the whole set is rebuilt on resize.

use crate::{
    config::MSAA_SAMPLES,
    data_structures::texture::Texture,
    pipelines::{composite::COMPOSITE_FORMAT, gbuffer::GBUFFER_FORMATS},
};

pub struct GBuffer {
    pub position: Texture,
    pub normal: Texture,
    pub albedo_spec: Texture,
}

impl GBuffer {
    pub fn views(&self) -> [&wgpu::TextureView; 3] {
        [&self.position.view, &self.normal.view, &self.albedo_spec.view]
    }
}

/// A scene colour target and its bright-pass companion.
pub struct HdrPair {
    pub scene: Texture,
    pub bright: Texture,
}

impl HdrPair {
    fn new(device: &wgpu::Device, size: [u32; 2], sample_count: u32, label: &str) -> Self {
        Self {
            scene: Texture::create_render_target(
                device,
                size,
                Texture::HDR_FORMAT,
                sample_count,
                &format!("{label} scene"),
            ),
            bright: Texture::create_render_target(
                device,
                size,
                Texture::HDR_FORMAT,
                sample_count,
                &format!("{label} bright"),
            ),
        }
    }
}

pub struct RenderTargets {
    pub size: [u32; 2],
    pub gbuffer: GBuffer,
    /// Single-sampled depth, shared by the g-buffer pass and the non-MSAA
    /// forward path.
    pub depth: Texture,
    /// Single-sampled HDR colour, sampled by post-processing.
    pub hdr: HdrPair,
    /// Multisampled twins resolved into `hdr`.
    pub hdr_msaa: HdrPair,
    pub depth_msaa: Texture,
    pub ping_pong: [Texture; 2],
    pub composite: Texture,
}

impl RenderTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = [width.max(1), height.max(1)];
        let [position_format, normal_format, albedo_format] = GBUFFER_FORMATS;
        let gbuffer = GBuffer {
            position: Texture::create_render_target(device, size, position_format, 1, "g-buffer position"),
            normal: Texture::create_render_target(device, size, normal_format, 1, "g-buffer normal"),
            albedo_spec: Texture::create_render_target(device, size, albedo_format, 1, "g-buffer albedo"),
        };
        let ping_pong = [0, 1].map(|i| {
            Texture::create_render_target(device, size, Texture::HDR_FORMAT, 1, &format!("ping-pong {i}"))
        });
        log::debug!("Render targets created at {}x{}", size[0], size[1]);

        Self {
            size,
            gbuffer,
            depth: Texture::create_depth_texture(device, size, 1, "depth_texture"),
            hdr: HdrPair::new(device, size, 1, "hdr"),
            hdr_msaa: HdrPair::new(device, size, MSAA_SAMPLES, "hdr msaa"),
            depth_msaa: Texture::create_depth_texture(device, size, MSAA_SAMPLES, "depth_texture msaa"),
            ping_pong,
            composite: Texture::create_render_target(device, size, COMPOSITE_FORMAT, 1, "composite"),
        }
    }

    /// Colour attachments for a pass writing the HDR pair, resolving the
    /// multisampled twins when `msaa` is set.
    pub fn hdr_attachments(
        &self,
        msaa: bool,
        load: wgpu::LoadOp<wgpu::Color>,
    ) -> [Option<wgpu::RenderPassColorAttachment<'_>>; 2] {
        let attachment = |view, resolve_target| {
            Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                depth_slice: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })
        };
        if msaa {
            [
                attachment(&self.hdr_msaa.scene.view, Some(&self.hdr.scene.view)),
                attachment(&self.hdr_msaa.bright.view, Some(&self.hdr.bright.view)),
            ]
        } else {
            [
                attachment(&self.hdr.scene.view, None),
                attachment(&self.hdr.bright.view, None),
            ]
        }
    }

    pub fn depth_view(&self, msaa: bool) -> &wgpu::TextureView {
        if msaa { &self.depth_msaa.view } else { &self.depth.view }
    }
}
