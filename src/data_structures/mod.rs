//! Scene data types: models, textures, instances and built-in geometry.
//!
//! - `model` contains mesh and material definitions plus the draw helpers
//! - `texture` wraps GPU textures, render targets and cube maps
//! - `instance` holds per-instance transforms and their GPU buffers
//! - `primitives` generates the floor, grass, cube and skybox geometry

pub mod instance;
pub mod model;
pub mod primitives;
pub mod texture;
