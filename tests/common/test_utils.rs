//! Headless GPU harness: a device without a surface and a read-back of
//! rendered textures into an [`image::RgbaImage`].

use std::time::Duration;

use night_drive::{
    camera::{Camera, CameraUniform, Projection},
    pipelines::{Layouts, basic::mk_uniform},
};

pub const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub struct Headless {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub layouts: Layouts,
    pub runtime: tokio::runtime::Runtime,
}

impl Headless {
    pub fn new() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (device, queue) = runtime.block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::PRIMARY,
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await?;
            let device = adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("headless device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                    trace: wgpu::Trace::Off,
                })
                .await?;
            anyhow::Ok(device)
        })?;
        let layouts = Layouts::new(&device);
        Ok(Self {
            device,
            queue,
            layouts,
            runtime,
        })
    }

    pub fn camera_group(&self, camera: &Camera, [width, height]: [u32; 2]) -> wgpu::BindGroup {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera, &Projection::new(width, height));
        let (_, group) = mk_uniform(&self.device, &self.layouts.camera, &uniform, "test camera");
        group
    }

    pub fn output_texture(&self, [width, height]: [u32; 2]) -> wgpu::Texture {
        self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test output"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OUTPUT_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    /// Copies `texture` into host memory. Rows are padded to the copy
    /// alignment on the GPU side and unpadded here.
    pub fn read_back(&self, mut encoder: wgpu::CommandEncoder, texture: &wgpu::Texture) -> image::RgbaImage {
        let (width, height) = (texture.width(), texture.height());
        let unpadded = 4 * width;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded = unpadded.div_ceil(align) * align;

        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("test read-back"),
            size: (padded * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(height),
                },
            },
            texture.size(),
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        self.runtime.block_on(async {
            let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
            let buffer_slice = output_buffer.slice(..);
            buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
                tx.send(result).unwrap();
            });
            self.device
                .poll(wgpu::PollType::Wait {
                    submission_index: None,
                    timeout: Some(Duration::from_secs(3)),
                })
                .unwrap();
            rx.receive().await.unwrap().unwrap();

            let data = buffer_slice.get_mapped_range();
            let pixels: Vec<u8> = data
                .chunks(padded as usize)
                .flat_map(|row| &row[..unpadded as usize])
                .copied()
                .collect();
            image::RgbaImage::from_raw(width, height, pixels).unwrap()
        })
    }
}
