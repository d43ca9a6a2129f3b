//! Compile-time settings of the demo.
//!
//! There is no command line; everything that can change between runs lives
//! in the state file (see [`crate::state`]).

pub const WINDOW_TITLE: &str = "Night Drive";
pub const SCREEN_WIDTH: u32 = 1200;
pub const SCREEN_HEIGHT: u32 = 900;

/// Sample count of the multisampled HDR targets while anti-aliasing is on.
pub const MSAA_SAMPLES: u32 = 4;
/// Number of separable blur passes (horizontal + vertical count as two).
pub const BLOOM_PASSES: usize = 10;

pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Root of every model, texture and the state file, relative to the working directory.
pub const RESOURCE_DIR: &str = "resources";
pub const STATE_FILE: &str = "resources/program_state.txt";
