//! wgpu rendering surface for the model viewer.
//!
//! Draws every scene node's meshes with simple ambient + directional
//! lighting over a grid floor, presenting into a winit window.
//!
//! # Invariants
//! - The surface never mutates the scene or the camera.
//! - GPU buffers for a node are uploaded once and dropped when the node
//!   leaves the scene.

mod gpu;
mod shaders;
mod surface;

pub use gpu::MeshRenderer;
pub use surface::{SurfaceError, WgpuSurface};
