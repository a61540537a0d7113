//! Rendering surface capability: renderer-agnostic interface.
//!
//! # Invariants
//! - A renderer reads the scene and camera; it never mutates either.
//! - `dispose` is idempotent and rendering after it is a no-op.
//!
//! The wgpu backend lives in `orbitview-render-wgpu`. [`DebugTextRenderer`]
//! is a headless implementation used by the CLI and by tests.

mod camera;
mod renderer;
mod scene;

pub use camera::PerspectiveCamera;
pub use renderer::{DebugTextRenderer, Renderable};
pub use scene::{Light, Scene, SceneNode};

pub fn crate_info() -> &'static str {
    "orbitview-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
