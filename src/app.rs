//! Window, event loop and the per-frame update.
//!
//! Each redraw follows the same order:
//! 1. advance the intro and the camera
//! 2. upload camera, instance and light data
//! 3. render the scene and post-process it
//! 4. draw the overlay and present

use std::{iter, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window},
};

use crate::{
    camera::CameraController,
    config::{SCREEN_HEIGHT, SCREEN_WIDTH, STATE_FILE, WINDOW_TITLE},
    context::Context,
    input::{self, Effect},
    intro::Intro,
    overlay::Overlay,
    renderer::Renderer,
    scene::Scene,
    state::ProgramState,
};

/// Zoom steps per wheel notch, and per pixel for touchpads.
const LINE_SCROLL: f32 = 1.0;
const PIXEL_SCROLL_SCALE: f32 = 0.05;

fn grab_cursor(window: &Window, grab: bool) {
    let result = if grab {
        window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
    } else {
        window.set_cursor_grab(CursorGrabMode::None)
    };
    if let Err(e) = result {
        log::warn!("Could not change the cursor grab: {e}");
    }
    window.set_cursor_visible(!grab);
}

/// Everything that exists once the window is up.
pub struct AppState {
    ctx: Context,
    state: ProgramState,
    controller: CameraController,
    scene: Scene,
    renderer: Renderer,
    overlay: Overlay,
    ctrl_held: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let mut state = ProgramState::load_or_default(STATE_FILE);
        Intro::start(&mut state);

        let ctx = Context::new(window, &state.camera).await?;
        let scene = Scene::load(&ctx.device, &ctx.queue, &ctx.layouts, &state).await;
        let renderer = Renderer::new(
            &ctx.device,
            &ctx.layouts,
            &scene,
            &state,
            [ctx.config.width, ctx.config.height],
            ctx.config.format,
        );
        let overlay = Overlay::new(&ctx.device, &ctx.queue, ctx.config.format);
        grab_cursor(&ctx.window, !state.gui_enabled);

        Ok(Self {
            ctx,
            state,
            controller: CameraController::new(),
            scene,
            renderer,
            overlay,
            ctrl_held: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.renderer
                .resize(&self.ctx.device, &self.ctx.layouts, width, height);
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) -> Effect {
        let PhysicalKey::Code(code) = event.physical_key else {
            return Effect::None;
        };
        let pressed = event.state == ElementState::Pressed;
        if self.controller.handle_key(code, pressed) || !pressed {
            return Effect::None;
        }
        match input::binding(code, event.repeat, self.ctrl_held) {
            Some(action) => input::apply(action, &mut self.state),
            None => Effect::None,
        }
    }

    fn update(&mut self, dt: Duration) {
        if Intro::advance(&mut self.state, dt) {
            self.controller.reset_mouse();
        }
        let mouse_look_active = self.state.mouse_look_active();
        self.controller.update(
            &mut self.state.camera,
            dt,
            self.state.keyboard_input_enabled,
            mouse_look_active,
        );
        self.ctx.update_camera(&self.state.camera);
        self.scene.update(&self.ctx.queue, &self.state);
        self.renderer.update(&self.ctx.queue, &self.scene, &self.state);
        if let Some(title) = self.overlay.window_title(&self.state, dt) {
            self.ctx.window.set_title(&title);
        }
    }

    fn render(&mut self, dt: Duration) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        if !self.ctx.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.encode(
            &mut encoder,
            &self.ctx.queue,
            &self.ctx.camera.bind_group,
            &self.scene,
            &self.state,
            &view,
        );
        self.overlay.draw(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &view,
            [self.ctx.config.width, self.ctx.config.height],
            &self.state,
            dt,
        );

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn save(&self) {
        match self.state.save(STATE_FILE) {
            Ok(()) => log::info!("Saved program state to {STATE_FILE}"),
            Err(e) => log::error!("Could not save program state: {e}"),
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    state: Option<AppState>,
    last_time: Instant,
}

impl App {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            state: None,
            last_time: Instant::now(),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create the window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self.async_runtime.block_on(AppState::new(window)) {
            Ok(mut app_state) => {
                let size = app_state.ctx.window.inner_size();
                app_state.resize(size.width, size.height);
                app_state.ctx.window.request_redraw();
                self.last_time = Instant::now();
                self.state = Some(app_state);
            }
            Err(e) => {
                log::error!("App initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.controller.handle_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::ModifiersChanged(modifiers) => {
                state.ctrl_held = modifiers.state().control_key();
            }
            WindowEvent::KeyboardInput { event, .. } => match state.handle_key(&event) {
                Effect::None => {}
                Effect::Exit => event_loop.exit(),
                Effect::CursorGrab(grab) => {
                    grab_cursor(&state.ctx.window, grab);
                    state.controller.reset_mouse();
                }
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * LINE_SCROLL,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * PIXEL_SCROLL_SCALE,
                };
                state.controller.handle_scroll(dy);
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state.update(dt);
                match state.render(dt) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {e}");
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.save();
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {e}");
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new()?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
