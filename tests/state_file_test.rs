use cgmath::Point3;
use night_drive::state::ProgramState;

#[test]
fn state_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("program_state.txt");

    let mut state = ProgramState::default();
    state.clear_color = [0.1, 0.2, 0.3];
    state.camera.position = Point3::new(4.0, 2.0, -8.0);
    state.spotlight = false;
    state.ambient_strength = 0.35;
    state.aa_enabled = false;
    state.save(&path).unwrap();

    let restored = ProgramState::load_or_default(&path);
    assert_eq!(restored.clear_color, [0.1, 0.2, 0.3]);
    assert_eq!(restored.camera.position, Point3::new(4.0, 2.0, -8.0));
    assert!(!restored.spotlight);
    assert_eq!(restored.ambient_strength, 0.35);
    // only the listed fields are persisted
    assert!(restored.aa_enabled);
    assert!(!restored.intro_complete);
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = ProgramState::default();
    assert!(!state.load(dir.path().join("nope.txt")).unwrap());

    let defaults = ProgramState::load_or_default(dir.path().join("nope.txt"));
    assert_eq!(defaults.camera.position, ProgramState::default().camera.position);
}

#[test]
fn malformed_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("program_state.txt");
    std::fs::write(&path, "0.5 0.5\nnot a number\n").unwrap();

    let mut state = ProgramState::default();
    assert!(state.load(&path).is_err());

    let state = ProgramState::load_or_default(&path);
    assert_eq!(state.clear_color, [0.0; 3]);
    assert!(state.spotlight);
}

#[test]
fn shipped_state_file_parses() {
    let mut state = ProgramState::default();
    assert!(state.load("resources/program_state.txt").unwrap());
}
