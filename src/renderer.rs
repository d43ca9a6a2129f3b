//! Pass sequencing for one frame.
//!
//! While the intro runs the lamps, floor and roads go through the g-buffer
//! and are lit by every street lamp in a deferred pass; the remaining objects
//! are drawn forward on top, reusing the g-buffer depth. Afterwards the whole
//! scene is drawn forward into the HDR targets, multisampled when
//! anti-aliasing is on. Both paths end in [`PostProcess::run`].

use instant::Instant;

use crate::{
    data_structures::model::DrawModel,
    lights::ForwardLights,
    pipelines::{
        Layouts, Pipelines,
        basic::mk_uniform,
        deferred::mk_gbuffer_bind_group,
    },
    postprocess::{PostProcess, PostSettings},
    scene::{Part, Scene},
    state::ProgramState,
    targets::RenderTargets,
};

pub struct Renderer {
    pub pipelines: Pipelines,
    pub targets: RenderTargets,
    postprocess: PostProcess,
    gbuffer_group: wgpu::BindGroup,
    forward_lights: wgpu::Buffer,
    forward_lights_group: wgpu::BindGroup,
    lamp_lights: wgpu::Buffer,
    lamp_lights_group: wgpu::BindGroup,
    start: Instant,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        layouts: &Layouts,
        scene: &Scene,
        state: &ProgramState,
        [width, height]: [u32; 2],
        output_format: wgpu::TextureFormat,
    ) -> Self {
        let pipelines = Pipelines::new(device, layouts, output_format);
        let targets = RenderTargets::new(device, width, height);
        let postprocess = PostProcess::new(device, layouts, &targets, output_format);
        let gbuffer_group = mk_gbuffer_bind_group(device, layouts, targets.gbuffer.views());
        let (forward_lights, forward_lights_group) = mk_uniform(
            device,
            &layouts.fragment_uniform,
            &ForwardLights::uniform(state),
            "forward_lights",
        );
        let (lamp_lights, lamp_lights_group) = mk_uniform(
            device,
            &layouts.fragment_uniform,
            &scene.lamp_lights.uniform(0.0, &state.camera),
            "lamp_lights",
        );
        Self {
            pipelines,
            targets,
            postprocess,
            gbuffer_group,
            forward_lights,
            forward_lights_group,
            lamp_lights,
            lamp_lights_group,
            start: Instant::now(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, layouts: &Layouts, width: u32, height: u32) {
        self.targets = RenderTargets::new(device, width, height);
        self.gbuffer_group = mk_gbuffer_bind_group(device, layouts, self.targets.gbuffer.views());
        self.postprocess.resize(device, layouts, &self.targets);
    }

    /// Uploads the light uniforms for this frame.
    pub fn update(&self, queue: &wgpu::Queue, scene: &Scene, state: &ProgramState) {
        queue.write_buffer(
            &self.forward_lights,
            0,
            bytemuck::bytes_of(&ForwardLights::uniform(state)),
        );
        if !state.intro_complete {
            let time = self.start.elapsed().as_secs_f32();
            queue.write_buffer(
                &self.lamp_lights,
                0,
                bytemuck::bytes_of(&scene.lamp_lights.uniform(time, &state.camera)),
            );
        }
    }

    /// Records the whole frame up to and including the screen pass into
    /// `output_view`.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        camera: &wgpu::BindGroup,
        scene: &Scene,
        state: &ProgramState,
        output_view: &wgpu::TextureView,
    ) {
        if state.intro_complete {
            self.forward_pass(encoder, camera, scene, state);
        } else {
            self.geometry_pass(encoder, camera, scene);
            self.lighting_pass(encoder, state);
            self.intro_overlay_pass(encoder, camera, scene);
        }

        let settings = PostSettings::from_state(state, state.intro_complete);
        self.postprocess
            .run(encoder, queue, &self.pipelines, &self.targets, &settings, output_view);
    }

    fn clear_color(state: &ProgramState) -> wgpu::LoadOp<wgpu::Color> {
        let [r, g, b] = state.clear_color.map(f64::from);
        wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 })
    }

    fn depth_attachment(view: &wgpu::TextureView, load: wgpu::LoadOp<f32>) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }

    fn draw_parts(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        parts: &[Part],
        scene: &Scene,
        msaa: bool,
        globals: &[&wgpu::BindGroup],
    ) {
        let pipelines = self.pipelines.forward(msaa);
        for &part in parts {
            let object = scene.object(part);
            if object.model.is_empty() || object.instances.is_empty() {
                continue;
            }
            pass.set_pipeline(pipelines.get(part.double_sided()));
            pass.set_vertex_buffer(1, object.instances.buffer.slice(..));
            pass.draw_model_instanced(&object.model, 0..object.instances.len(), globals);
        }
    }

    fn draw_skybox(&self, pass: &mut wgpu::RenderPass<'_>, camera: &wgpu::BindGroup, scene: &Scene, msaa: bool) {
        pass.set_pipeline(self.pipelines.skybox(msaa));
        pass.set_bind_group(0, &scene.skybox.bind_group, &[]);
        pass.set_bind_group(1, camera, &[]);
        pass.draw_model_untextured(&scene.skybox.cube, 0..1);
    }

    fn forward_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        camera: &wgpu::BindGroup,
        scene: &Scene,
        state: &ProgramState,
    ) {
        let msaa = state.aa_enabled;
        let color_attachments = self.targets.hdr_attachments(msaa, Self::clear_color(state));
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Forward Pass"),
            color_attachments: &color_attachments,
            depth_stencil_attachment: Some(Self::depth_attachment(
                self.targets.depth_view(msaa),
                wgpu::LoadOp::Clear(1.0),
            )),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        self.draw_parts(
            &mut pass,
            Part::forward(true),
            scene,
            msaa,
            &[camera, &self.forward_lights_group],
        );
        self.draw_skybox(&mut pass, camera, scene, msaa);
    }

    fn geometry_pass(&self, encoder: &mut wgpu::CommandEncoder, camera: &wgpu::BindGroup, scene: &Scene) {
        let color_attachments: Vec<_> = self
            .targets
            .gbuffer
            .views()
            .into_iter()
            .map(|view| {
                Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })
            })
            .collect();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("G-Buffer Pass"),
            color_attachments: &color_attachments,
            depth_stencil_attachment: Some(Self::depth_attachment(
                &self.targets.depth.view,
                wgpu::LoadOp::Clear(1.0),
            )),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipelines.gbuffer);
        for part in Part::DEFERRED {
            let object = scene.object(part);
            if object.model.is_empty() {
                continue;
            }
            pass.set_vertex_buffer(1, object.instances.buffer.slice(..));
            pass.draw_model_instanced(&object.model, 0..object.instances.len(), &[camera]);
        }
    }

    fn lighting_pass(&self, encoder: &mut wgpu::CommandEncoder, state: &ProgramState) {
        let color_attachments = self.targets.hdr_attachments(false, Self::clear_color(state));
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Deferred Lighting Pass"),
            color_attachments: &color_attachments,
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipelines.deferred);
        pass.set_bind_group(0, &self.gbuffer_group, &[]);
        pass.set_bind_group(1, &self.lamp_lights_group, &[]);
        pass.draw(0..3, 0..1);
    }

    /// Light boxes, the forward-lit intro objects and the sky, depth-tested
    /// against what the geometry pass left behind.
    fn intro_overlay_pass(&self, encoder: &mut wgpu::CommandEncoder, camera: &wgpu::BindGroup, scene: &Scene) {
        let color_attachments = self.targets.hdr_attachments(false, wgpu::LoadOp::Load);
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Intro Forward Pass"),
            color_attachments: &color_attachments,
            depth_stencil_attachment: Some(Self::depth_attachment(
                &self.targets.depth.view,
                wgpu::LoadOp::Load,
            )),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let boxes = &scene.light_boxes;
        pass.set_pipeline(&self.pipelines.light_box);
        pass.set_bind_group(0, camera, &[]);
        pass.set_vertex_buffer(1, boxes.instances.buffer.slice(..));
        pass.set_vertex_buffer(2, boxes.colors.slice(..));
        pass.draw_model_untextured(&boxes.cube, 0..boxes.instances.len());

        self.draw_parts(
            &mut pass,
            Part::forward(false),
            scene,
            false,
            &[camera, &self.forward_lights_group],
        );
        self.draw_skybox(&mut pass, camera, scene, false);
    }
}
