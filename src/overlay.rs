//! Debug GUI shown with F1.
//!
//! The panel contents are plain text built from [`ProgramState`]. With the
//! `ui` feature they are drawn over the frame with glyphon; without it the
//! window title carries a one-line summary instead.

use instant::Duration;

use crate::{config::WINDOW_TITLE, state::ProgramState};

/// How often the window title is rewritten when there is no text overlay.
const TITLE_REFRESH: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: &'static str,
    pub lines: Vec<String>,
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

pub fn fps(dt: Duration) -> u32 {
    let secs = dt.as_secs_f32();
    if secs > 0.0 { (1.0 / secs).floor() as u32 } else { 0 }
}

/// The panels visible in the current frame, top to bottom. Nothing is shown
/// while the GUI is off.
pub fn panels(state: &ProgramState, dt: Duration) -> Vec<Panel> {
    if !state.gui_enabled {
        return Vec::new();
    }
    let c = &state.camera;
    let p = state.prop_position;
    vec![
        Panel {
            title: "Settings",
            lines: vec![
                format!("Ambient light strength: {:.3} (Up/Down)", state.ambient_strength),
                format!(
                    "Prop position: ({:.2}, {:.2}, {:.2}) (Ctrl+arrows, PgUp/PgDn)",
                    p.x, p.y, p.z
                ),
                format!("Prop scale: {:.2} (Left/Right)", state.prop_scale),
            ],
        },
        Panel {
            title: "Camera info",
            lines: vec![
                format!(
                    "Camera position: ({:.3}, {:.3}, {:.3})",
                    c.position.x, c.position.y, c.position.z
                ),
                format!("(Yaw, Pitch): ({:.3}, {:.3})", c.yaw, c.pitch),
                format!("Camera front: ({:.3}, {:.3}, {:.3})", c.front.x, c.front.y, c.front.z),
                "- Toggle camera movement on/off: C".to_string(),
                "- Reset camera position: P".to_string(),
                "- Toggle camera spotlight on/off: K".to_string(),
            ],
        },
        Panel {
            title: "Anti-aliasing settings",
            lines: vec![
                format!("Anti-Aliasing (shortcut: F2): {}", on_off(state.aa_enabled)),
                format!("Grayscale (shortcut: F3): {}", on_off(state.grayscale_enabled)),
            ],
        },
        Panel {
            title: "FPS",
            lines: vec![fps(dt).to_string()],
        },
    ]
}

/// Window title standing in for the panels when text cannot be drawn.
pub fn title(state: &ProgramState, dt: Duration) -> String {
    if !state.gui_enabled {
        return WINDOW_TITLE.to_string();
    }
    format!(
        "{WINDOW_TITLE} | {} FPS | AA {} | grayscale {} | HDR {} | bloom {} | exposure {:.2}",
        fps(dt),
        on_off(state.aa_enabled),
        on_off(state.grayscale_enabled),
        on_off(state.hdr),
        on_off(state.bloom),
        state.exposure,
    )
}

pub struct Overlay {
    since_title: Duration,
    last_title: String,
    #[cfg(feature = "ui")]
    text: text::TextOverlay,
}

impl Overlay {
    #[allow(unused_variables)]
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            since_title: TITLE_REFRESH,
            last_title: WINDOW_TITLE.to_string(),
            #[cfg(feature = "ui")]
            text: text::TextOverlay::new(device, queue, format),
        }
    }

    /// Draws onto `view`, which already holds the finished frame.
    #[allow(unused_variables)]
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size: [u32; 2],
        state: &ProgramState,
        dt: Duration,
    ) {
        #[cfg(feature = "ui")]
        self.text.draw(device, queue, encoder, view, size, &panels(state, dt));
    }

    /// The title the window should switch to, if any. Throttled so the FPS
    /// stays readable.
    pub fn window_title(&mut self, state: &ProgramState, dt: Duration) -> Option<String> {
        if cfg!(feature = "ui") {
            return None;
        }
        self.since_title += dt;
        if self.since_title < TITLE_REFRESH && state.gui_enabled {
            return None;
        }
        self.since_title = Duration::ZERO;
        let title = title(state, dt);
        if title == self.last_title {
            return None;
        }
        self.last_title = title.clone();
        Some(title)
    }
}

#[cfg(feature = "ui")]
mod text {
    use glyphon::{
        Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache, TextArea,
        TextAtlas, TextBounds, TextRenderer, Viewport,
    };

    use super::Panel;

    const FONT_SIZE: f32 = 16.0;
    const LINE_HEIGHT: f32 = 20.0;
    const PANEL_WIDTH: f32 = 500.0;
    const PANEL_GAP: f32 = 50.0;
    const FPS_WIDTH: f32 = 60.0;

    pub struct TextOverlay {
        font_system: FontSystem,
        swash_cache: SwashCache,
        viewport: Viewport,
        atlas: TextAtlas,
        renderer: TextRenderer,
        buffers: Vec<Buffer>,
    }

    impl TextOverlay {
        pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
            let cache = Cache::new(device);
            let viewport = Viewport::new(device, &cache);
            let mut atlas = TextAtlas::new(device, queue, &cache, format);
            let renderer = TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);
            Self {
                font_system: FontSystem::new(),
                swash_cache: SwashCache::new(),
                viewport,
                atlas,
                renderer,
                buffers: Vec::new(),
            }
        }

        pub fn draw(
            &mut self,
            device: &wgpu::Device,
            queue: &wgpu::Queue,
            encoder: &mut wgpu::CommandEncoder,
            view: &wgpu::TextureView,
            [width, height]: [u32; 2],
            panels: &[Panel],
        ) {
            if panels.is_empty() {
                return;
            }
            self.viewport.update(queue, Resolution { width, height });

            self.buffers = panels
                .iter()
                .map(|panel| {
                    let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(FONT_SIZE, LINE_HEIGHT));
                    let text = std::iter::once(format!("{}:", panel.title))
                        .chain(panel.lines.iter().cloned())
                        .collect::<Vec<_>>()
                        .join("\n");
                    buffer.set_size(&mut self.font_system, Some(PANEL_WIDTH), None);
                    buffer.set_text(
                        &mut self.font_system,
                        &text,
                        &Attrs::new().family(Family::Monospace),
                        Shaping::Basic,
                        None,
                    );
                    buffer.shape_until_scroll(&mut self.font_system, false);
                    buffer
                })
                .collect();

            // Settings panels stack on the left, the FPS counter sits top right.
            let mut top = 0.0;
            let areas: Vec<TextArea> = panels
                .iter()
                .zip(&self.buffers)
                .map(|(panel, buffer)| {
                    let (left, this_top) = if panel.title == "FPS" {
                        (width as f32 - FPS_WIDTH, 0.0)
                    } else {
                        let this_top = top;
                        top += (panel.lines.len() + 1) as f32 * LINE_HEIGHT + PANEL_GAP;
                        (0.0, this_top)
                    };
                    TextArea {
                        buffer,
                        left,
                        top: this_top,
                        scale: 1.0,
                        bounds: TextBounds {
                            left: 0,
                            top: 0,
                            right: width as i32,
                            bottom: height as i32,
                        },
                        default_color: Color::rgb(255, 255, 255),
                        custom_glyphs: &[],
                    }
                })
                .collect();

            if let Err(e) = self.renderer.prepare(
                device,
                queue,
                &mut self.font_system,
                &mut self.atlas,
                &self.viewport,
                areas,
                &mut self.swash_cache,
            ) {
                log::warn!("Overlay text could not be prepared: {e}");
                return;
            }

            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        depth_slice: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });
                if let Err(e) = self.renderer.render(&self.atlas, &self.viewport, &mut pass) {
                    log::warn!("Overlay text could not be drawn: {e}");
                }
            }
            self.atlas.trim();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gui_state() -> ProgramState {
        ProgramState {
            gui_enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn nothing_without_gui() {
        let state = ProgramState::default();
        assert!(panels(&state, Duration::from_millis(16)).is_empty());
        assert_eq!(title(&state, Duration::from_millis(16)), WINDOW_TITLE);
    }

    #[test]
    fn four_panels_with_gui() {
        let titles: Vec<_> = panels(&gui_state(), Duration::from_millis(16))
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["Settings", "Camera info", "Anti-aliasing settings", "FPS"]);
    }

    #[test]
    fn fps_is_floored() {
        assert_eq!(fps(Duration::from_millis(16)), 62);
        assert_eq!(fps(Duration::from_millis(1000)), 1);
        assert_eq!(fps(Duration::ZERO), 0);
    }

    #[test]
    fn toggles_are_reported() {
        let mut state = gui_state();
        state.aa_enabled = false;
        state.grayscale_enabled = true;
        let aa = &panels(&state, Duration::from_millis(16))[2];
        assert_eq!(aa.lines[0], "Anti-Aliasing (shortcut: F2): off");
        assert_eq!(aa.lines[1], "Grayscale (shortcut: F3): on");
        assert!(title(&state, Duration::from_millis(20)).contains("50 FPS"));
    }

    #[test]
    fn camera_hints_are_listed() {
        let camera = &panels(&gui_state(), Duration::from_millis(16))[1];
        for key in ["C", "P", "K"] {
            assert!(camera.lines.iter().any(|l| l.ends_with(&format!(": {key}"))));
        }
    }
}
