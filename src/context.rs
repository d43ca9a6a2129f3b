use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, CameraUniform, Projection},
    pipelines::{Layouts, basic::mk_uniform},
};

/// The GPU handles, the surface and everything derived from the window size.
#[derive(Debug)]
pub struct Context {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub layouts: Layouts,
    pub camera: CameraResources,
    pub projection: Projection,
    pub is_surface_configured: bool,
}

impl Context {
    pub async fn new(window: Arc<Window>, camera: &Camera) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no adapter can present to this window")?;
        log::info!("Adapter: {}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting the device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // A linear surface works too; the screen pass encodes gamma itself then.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no formats")?;
        let present_mode = if surface_caps.present_modes.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            surface_caps.present_modes[0]
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface format {surface_format:?}, present mode {present_mode:?}");

        let layouts = Layouts::new(&device);
        let projection = Projection::new(config.width, config.height);

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera, &projection);
        let (buffer, bind_group) = mk_uniform(&device, &layouts.camera, &uniform, "camera_bind_group");
        let camera = CameraResources {
            uniform,
            buffer,
            bind_group,
            bind_group_layout: layouts.camera.clone(),
        };

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            layouts,
            camera,
            projection,
            is_surface_configured: false,
        })
    }

    /// Applies a new window size. Zero sizes (minimised windows) are ignored
    /// and leave the surface unconfigured.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.projection.resize(width, height);
        self.surface.configure(&self.device, &self.config);
        self.is_surface_configured = true;
        true
    }

    pub fn update_camera(&mut self, camera: &Camera) {
        self.camera.uniform.update_view_proj(camera, &self.projection);
        self.queue
            .write_buffer(&self.camera.buffer, 0, bytemuck::cast_slice(&[self.camera.uniform]));
    }
}
