//! night-drive
//!
//! A night-time street scene: a scripted drive towards a crossing lit by
//! street lamps through a deferred pass, then a free fly camera with a
//! flashlight, forward Blinn-Phong lighting, MSAA, bloom and HDR tone mapping.
//!
//! High-level modules
//! - `app`: window, event loop and the per-frame update order
//! - `camera`: fly camera, its controller and the view/projection uniform
//! - `context`: device, queue, surface and the camera GPU resources
//! - `data_structures`: meshes, materials, textures, instances, primitives
//! - `input`: the fixed key binding table
//! - `intro`: the scripted flythrough
//! - `lights`: street lamps and the forward light set
//! - `overlay`: debug GUI text
//! - `pipelines`: every render pipeline and the shared layouts
//! - `postprocess`: bloom, tone mapping and the final screen pass
//! - `renderer`: pass sequencing for one frame
//! - `resources`: obj/mtl, texture and cube map loading
//! - `scene`: the models and where they stand
//! - `state`: program state and its save file
//! - `targets`: off-screen render targets

pub mod app;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod input;
pub mod intro;
pub mod lights;
pub mod overlay;
pub mod pipelines;
pub mod postprocess;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod state;
pub mod targets;

pub use app::run;
