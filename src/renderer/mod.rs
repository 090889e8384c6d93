//! WebGPU rendering module
//!
//! Geometry is built on the CPU in arena pixels (`scene`, `shapes`) and
//! drawn as one flat-colored triangle list (`pipeline`).

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, SurfaceRecovery};
pub use scene::{build_scene, chart_rect};
pub use vertex::Vertex;
