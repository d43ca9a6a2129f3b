#![cfg(feature = "integration-tests")]

mod common;

use common::test_utils::{Headless, OUTPUT_FORMAT};
use night_drive::{renderer::Renderer, scene::Scene, state::ProgramState};

const SIZE: [u32; 2] = [160, 120];

fn render(gpu: &Headless, state: &ProgramState, size: [u32; 2]) -> image::RgbaImage {
    let scene = gpu
        .runtime
        .block_on(Scene::load(&gpu.device, &gpu.queue, &gpu.layouts, state));
    let renderer = Renderer::new(&gpu.device, &gpu.layouts, &scene, state, size, OUTPUT_FORMAT);
    renderer.update(&gpu.queue, &scene, state);

    let camera = gpu.camera_group(&state.camera, size);
    let output = gpu.output_texture(size);
    let view = output.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("test encoder") });
    renderer.encode(&mut encoder, &gpu.queue, &camera, &scene, state, &view);
    gpu.read_back(encoder, &output)
}

fn free_camera_state() -> ProgramState {
    let mut state = ProgramState::default();
    state.intro_complete = true;
    state.camera.position = cgmath::Point3::new(-1.5, 1.0, -2.0);
    state.clear_color = [0.2, 0.4, 0.1];
    state
}

#[test]
fn grayscale_output_has_equal_channels() {
    let gpu = Headless::new().unwrap();
    for intro_complete in [false, true] {
        let mut state = free_camera_state();
        state.intro_complete = intro_complete;
        state.grayscale_enabled = true;
        let img = render(&gpu, &state, SIZE);
        for pixel in img.pixels() {
            let [r, g, b, a] = pixel.0;
            assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1, "{pixel:?}");
            assert_eq!(a, 255);
        }
    }
}

#[test]
fn every_switch_combination_renders() {
    let gpu = Headless::new().unwrap();
    for bits in 0..8u8 {
        let mut state = free_camera_state();
        state.aa_enabled = bits & 1 != 0;
        state.hdr = bits & 2 != 0;
        state.bloom = bits & 4 != 0;
        let img = render(&gpu, &state, SIZE);
        assert_eq!(img.dimensions(), (SIZE[0], SIZE[1]));
        assert!(img.pixels().all(|p| p.0[3] == 255));
    }
}

#[test]
fn resized_targets_match_the_output() {
    let gpu = Headless::new().unwrap();
    let state = free_camera_state();
    let scene = gpu
        .runtime
        .block_on(Scene::load(&gpu.device, &gpu.queue, &gpu.layouts, &state));
    let mut renderer = Renderer::new(&gpu.device, &gpu.layouts, &scene, &state, SIZE, OUTPUT_FORMAT);
    renderer.resize(&gpu.device, &gpu.layouts, 64, 48);
    assert_eq!(renderer.targets.size, [64, 48]);

    let camera = gpu.camera_group(&state.camera, [64, 48]);
    let output = gpu.output_texture([64, 48]);
    let view = output.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    renderer.encode(&mut encoder, &gpu.queue, &camera, &scene, &state, &view);
    let img = gpu.read_back(encoder, &output);
    assert_eq!(img.dimensions(), (64, 48));
}
