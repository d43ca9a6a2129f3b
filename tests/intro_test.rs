use instant::Duration;
use night_drive::{
    camera::CameraController,
    input::{self, Action, Effect},
    intro::{HANDOVER_X, Intro, START_POSITION},
    state::ProgramState,
};
use winit::keyboard::KeyCode;

const FRAME: Duration = Duration::from_millis(16);

/// Mirrors the per-frame order of the application: intro, then camera.
fn frame(state: &mut ProgramState, controller: &mut CameraController) -> bool {
    let finished = Intro::advance(state, FRAME);
    if finished {
        controller.reset_mouse();
    }
    let mouse_look_active = state.mouse_look_active();
    controller.update(
        &mut state.camera,
        FRAME,
        state.keyboard_input_enabled,
        mouse_look_active,
    );
    finished
}

#[test]
fn input_is_ignored_until_the_drive_ends() {
    let mut state = ProgramState::default();
    let mut controller = CameraController::new();
    Intro::start(&mut state);
    assert_eq!(state.camera.position, START_POSITION);

    controller.handle_key(KeyCode::KeyA, true);
    controller.handle_mouse(0.0, 0.0);
    controller.handle_mouse(300.0, 0.0);
    let yaw = state.camera.yaw;

    let mut frames = 0;
    while !frame(&mut state, &mut controller) {
        assert_eq!(state.camera.position.x, START_POSITION.x);
        assert_eq!(state.camera.yaw, yaw);
        frames += 1;
        assert!(frames < 10_000, "intro never finished");
    }
    // 120 units at 15 units per second
    assert!((490..=510).contains(&frames), "{frames} frames");
    assert!(state.camera.position.z < 0.0);

    // strafing left works once the player has the camera
    let x = state.camera.position.x;
    assert!(x < HANDOVER_X);
    frame(&mut state, &mut controller);
    assert!(state.camera.position.x < x);
}

#[test]
fn mouse_turns_the_camera_after_handover() {
    let mut state = ProgramState::default();
    let mut controller = CameraController::new();
    Intro::start(&mut state);
    while !frame(&mut state, &mut controller) {}

    // first motion after the handover is swallowed
    controller.handle_mouse(50.0, 0.0);
    frame(&mut state, &mut controller);
    let yaw = state.camera.yaw;
    controller.handle_mouse(50.0, 0.0);
    frame(&mut state, &mut controller);
    assert!(state.camera.yaw > yaw);

    // with the GUI open the mouse is free and the camera stays put
    assert_eq!(input::apply(Action::ToggleGui, &mut state), Effect::CursorGrab(false));
    let yaw = state.camera.yaw;
    controller.handle_mouse(50.0, 0.0);
    frame(&mut state, &mut controller);
    assert_eq!(state.camera.yaw, yaw);
}

#[test]
fn completed_intro_is_not_replayed() {
    let mut state = ProgramState::default();
    state.intro_complete = true;
    state.camera.position.z = -30.0;
    Intro::start(&mut state);
    assert_eq!(state.camera.position.z, -30.0);
    assert!(!Intro::advance(&mut state, FRAME));
}
