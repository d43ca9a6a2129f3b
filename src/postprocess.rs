//! Bloom, tone mapping and the final screen pass.
//!
//! The frame arrives in [`RenderTargets::hdr`]. The bright buffer is blurred
//! back and forth between the two ping-pong targets, added onto the scene and
//! tone mapped into the composite target, which the screen pass copies onto
//! the surface with the optional grayscale filter.

use crate::{
    config::BLOOM_PASSES,
    data_structures::texture::create_clamping_sampler,
    pipelines::{
        Layouts, Pipelines,
        basic::{mk_uniform, screen_textures_bind_group},
        blur::BlurParams,
        composite::CompositeSettings,
        screen::ScreenSettings,
    },
    state::ProgramState,
    targets::RenderTargets,
};

/// What a blur step samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurSource {
    Bright,
    PingPong(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurStep {
    pub source: BlurSource,
    /// Index of the ping-pong target written.
    pub target: usize,
    pub horizontal: bool,
}

/// The order of the separable blur passes. The first step reads the bright
/// buffer, every later one the target the previous step wrote.
pub fn bloom_schedule(passes: usize) -> Vec<BlurStep> {
    let mut steps = Vec::with_capacity(passes);
    let mut source = BlurSource::Bright;
    let mut horizontal = true;
    for _ in 0..passes {
        let target = horizontal as usize;
        steps.push(BlurStep {
            source,
            target,
            horizontal,
        });
        source = BlurSource::PingPong(target);
        horizontal = !horizontal;
    }
    steps
}

/// Where the blurred bloom ends up after `passes` steps.
pub fn bloom_result(passes: usize) -> BlurSource {
    bloom_schedule(passes)
        .last()
        .map_or(BlurSource::Bright, |step| BlurSource::PingPong(step.target))
}

/// Per-frame switches of the post-processing chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostSettings {
    pub composite: CompositeSettings,
    pub grayscale: bool,
}

impl PostSettings {
    pub fn from_state(state: &ProgramState, bloom_allowed: bool) -> Self {
        let mut composite = CompositeSettings::from(state);
        if !bloom_allowed {
            composite.bloom = 0;
        }
        Self {
            composite,
            grayscale: state.grayscale_enabled,
        }
    }

    pub fn bloom(&self) -> bool {
        self.composite.bloom != 0
    }
}

struct SourceGroups {
    bright: wgpu::BindGroup,
    ping_pong: [wgpu::BindGroup; 2],
}

impl SourceGroups {
    fn get(&self, source: BlurSource) -> &wgpu::BindGroup {
        match source {
            BlurSource::Bright => &self.bright,
            BlurSource::PingPong(i) => &self.ping_pong[i],
        }
    }
}

pub struct PostProcess {
    sampler: wgpu::Sampler,
    schedule: Vec<BlurStep>,
    blur_sources: SourceGroups,
    /// Scene paired with each possible bloom result.
    composite_sources: SourceGroups,
    screen_source: wgpu::BindGroup,
    /// Indexed by `horizontal as usize`.
    blur_params: [wgpu::BindGroup; 2],
    composite_buffer: wgpu::Buffer,
    composite_group: wgpu::BindGroup,
    screen_buffer: wgpu::Buffer,
    screen_group: wgpu::BindGroup,
    output_format: wgpu::TextureFormat,
}

impl PostProcess {
    pub fn new(
        device: &wgpu::Device,
        layouts: &Layouts,
        targets: &RenderTargets,
        output_format: wgpu::TextureFormat,
    ) -> Self {
        let sampler = create_clamping_sampler(device);
        let (blur_sources, composite_sources, screen_source) =
            Self::source_groups(device, layouts, targets, &sampler);
        let blur_params = [false, true].map(|horizontal| {
            mk_uniform(
                device,
                &layouts.fragment_uniform,
                &BlurParams::new(horizontal),
                "blur_params",
            )
            .1
        });
        let (composite_buffer, composite_group) = mk_uniform(
            device,
            &layouts.fragment_uniform,
            &CompositeSettings::new(true, true, 1.0),
            "composite_settings",
        );
        let (screen_buffer, screen_group) = mk_uniform(
            device,
            &layouts.fragment_uniform,
            &ScreenSettings::new(false, output_format),
            "screen_settings",
        );

        Self {
            sampler,
            schedule: bloom_schedule(BLOOM_PASSES),
            blur_sources,
            composite_sources,
            screen_source,
            blur_params,
            composite_buffer,
            composite_group,
            screen_buffer,
            screen_group,
            output_format,
        }
    }

    fn source_groups(
        device: &wgpu::Device,
        layouts: &Layouts,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) -> (SourceGroups, SourceGroups, wgpu::BindGroup) {
        let one = |view: &wgpu::TextureView, label| {
            screen_textures_bind_group(device, &layouts.one_texture, &[view], sampler, label)
        };
        let scene_with = |bloom: &wgpu::TextureView, label| {
            screen_textures_bind_group(
                device,
                &layouts.two_textures,
                &[&targets.hdr.scene.view, bloom],
                sampler,
                label,
            )
        };
        let [ping, pong] = &targets.ping_pong;
        let blur = SourceGroups {
            bright: one(&targets.hdr.bright.view, "blur source bright"),
            ping_pong: [
                one(&ping.view, "blur source ping"),
                one(&pong.view, "blur source pong"),
            ],
        };
        let composite = SourceGroups {
            bright: scene_with(&targets.hdr.bright.view, "composite source bright"),
            ping_pong: [
                scene_with(&ping.view, "composite source ping"),
                scene_with(&pong.view, "composite source pong"),
            ],
        };
        let screen = one(&targets.composite.view, "screen source");
        (blur, composite, screen)
    }

    /// Rebinds the inputs after the targets were recreated.
    pub fn resize(&mut self, device: &wgpu::Device, layouts: &Layouts, targets: &RenderTargets) {
        let (blur, composite, screen) = Self::source_groups(device, layouts, targets, &self.sampler);
        self.blur_sources = blur;
        self.composite_sources = composite;
        self.screen_source = screen;
    }

    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        pipelines: &Pipelines,
        targets: &RenderTargets,
        settings: &PostSettings,
        output_view: &wgpu::TextureView,
    ) {
        queue.write_buffer(&self.composite_buffer, 0, bytemuck::bytes_of(&settings.composite));
        queue.write_buffer(
            &self.screen_buffer,
            0,
            bytemuck::bytes_of(&ScreenSettings::new(settings.grayscale, self.output_format)),
        );

        let mut bloom = BlurSource::Bright;
        if settings.bloom() {
            for step in &self.schedule {
                let mut pass = screen_pass(encoder, &targets.ping_pong[step.target].view, "Blur Pass");
                pass.set_pipeline(&pipelines.blur);
                pass.set_bind_group(0, self.blur_sources.get(step.source), &[]);
                pass.set_bind_group(1, &self.blur_params[step.horizontal as usize], &[]);
                pass.draw(0..3, 0..1);
                bloom = BlurSource::PingPong(step.target);
            }
        }

        {
            let mut pass = screen_pass(encoder, &targets.composite.view, "Composite Pass");
            pass.set_pipeline(&pipelines.composite);
            pass.set_bind_group(0, self.composite_sources.get(bloom), &[]);
            pass.set_bind_group(1, &self.composite_group, &[]);
            pass.draw(0..3, 0..1);
        }

        let mut pass = screen_pass(encoder, output_view, "Screen Pass");
        pass.set_pipeline(&pipelines.screen);
        pass.set_bind_group(0, &self.screen_source, &[]);
        pass.set_bind_group(1, &self.screen_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

/// A colour-only pass covering the whole target with a full-screen triangle.
fn screen_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    label: &str,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            depth_slice: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        occlusion_query_set: None,
        timestamp_writes: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_reads_bright_buffer() {
        let steps = bloom_schedule(BLOOM_PASSES);
        assert_eq!(steps.len(), BLOOM_PASSES);
        assert_eq!(
            steps[0],
            BlurStep {
                source: BlurSource::Bright,
                target: 1,
                horizontal: true,
            }
        );
    }

    #[test]
    fn steps_alternate_and_chain() {
        let steps = bloom_schedule(6);
        for pair in steps.windows(2) {
            assert_ne!(pair[0].horizontal, pair[1].horizontal);
            assert_eq!(pair[1].source, BlurSource::PingPong(pair[0].target));
            assert_ne!(pair[0].target, pair[1].target);
        }
        assert!(steps.iter().all(|s| s.target == s.horizontal as usize));
    }

    #[test]
    fn result_is_last_written_target() {
        assert_eq!(bloom_result(0), BlurSource::Bright);
        assert_eq!(bloom_result(1), BlurSource::PingPong(1));
        assert_eq!(bloom_result(BLOOM_PASSES), BlurSource::PingPong(0));
    }

    #[test]
    fn intro_disables_bloom() {
        let state = ProgramState::default();
        assert!(PostSettings::from_state(&state, true).bloom());
        assert!(!PostSettings::from_state(&state, false).bloom());
    }
}
