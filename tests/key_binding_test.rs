use cgmath::{InnerSpace, Vector3};
use night_drive::{
    input::{Effect, apply, binding},
    state::ProgramState,
};
use winit::keyboard::KeyCode;

fn press_ctrl(state: &mut ProgramState, key: KeyCode) -> Effect {
    binding(key, false, true).map_or(Effect::None, |action| apply(action, state))
}

fn press(state: &mut ProgramState, key: KeyCode) -> Effect {
    binding(key, false, false).map_or(Effect::None, |action| apply(action, state))
}

#[test]
fn function_keys_toggle_render_switches() {
    let mut state = ProgramState::default();
    assert!(state.aa_enabled && !state.grayscale_enabled);

    press(&mut state, KeyCode::F2);
    press(&mut state, KeyCode::F3);
    assert!(!state.aa_enabled);
    assert!(state.grayscale_enabled);

    press(&mut state, KeyCode::KeyH);
    press(&mut state, KeyCode::KeyB);
    assert!(!state.hdr && !state.bloom);

    press(&mut state, KeyCode::KeyK);
    assert!(!state.spotlight);
}

#[test]
fn escape_requests_exit() {
    let mut state = ProgramState::default();
    assert_eq!(press(&mut state, KeyCode::Escape), Effect::Exit);
}

#[test]
fn held_exposure_keys_keep_stepping() {
    let mut state = ProgramState::default();
    let start = state.exposure;
    for repeat in [false, true, true, true] {
        if let Some(action) = binding(KeyCode::KeyE, repeat, false) {
            apply(action, &mut state);
        }
    }
    assert!((state.exposure - (start + 0.04)).abs() < 1e-5);

    // a held toggle only fires once
    for repeat in [false, true, true] {
        if let Some(action) = binding(KeyCode::F3, repeat, false) {
            apply(action, &mut state);
        }
    }
    assert!(state.grayscale_enabled);
}

#[test]
fn reset_puts_camera_in_front_of_origin() {
    let mut state = ProgramState::default();
    state.camera.yaw = 10.0;
    press(&mut state, KeyCode::KeyP);
    assert_eq!(state.camera.position, cgmath::Point3::new(0.0, 0.0, 3.0));
    assert!((state.camera.front.z + 1.0).abs() < 1e-5);
}

#[test]
fn gui_sliders_need_the_gui() {
    let mut state = ProgramState::default();
    press(&mut state, KeyCode::ArrowRight);
    assert_eq!(state.prop_scale, 1.0);

    assert_eq!(press(&mut state, KeyCode::F1), Effect::CursorGrab(false));
    press(&mut state, KeyCode::ArrowRight);
    assert!(state.prop_scale > 1.0);
    assert_eq!(press(&mut state, KeyCode::KeyC), Effect::CursorGrab(true));
}

#[test]
fn movement_keys_are_not_bindings() {
    for key in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD, KeyCode::Space] {
        assert_eq!(binding(key, false, false), None);
    }
}

#[test]
fn prop_moves_only_while_the_gui_is_shown() {
    let mut state = ProgramState::default();
    let start = state.prop_position;
    press_ctrl(&mut state, KeyCode::ArrowRight);
    press(&mut state, KeyCode::PageUp);
    assert_eq!(state.prop_position, start);

    press(&mut state, KeyCode::F1);
    press_ctrl(&mut state, KeyCode::ArrowRight);
    press_ctrl(&mut state, KeyCode::ArrowUp);
    press(&mut state, KeyCode::PageUp);
    press(&mut state, KeyCode::PageUp);
    let moved = state.prop_position - start;
    assert!((moved - Vector3::new(0.05, 0.1, -0.05)).magnitude() < 1e-5, "{moved:?}");
    // plain arrows still drive the sliders
    assert_eq!(state.prop_scale, 1.0);
    press(&mut state, KeyCode::ArrowRight);
    assert!(state.prop_scale > 1.0);
    assert!((state.prop_position - start - moved).magnitude() < 1e-6);
}
