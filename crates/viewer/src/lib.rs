//! Interactive viewer for a single external 3D model.
//!
//! A [`Viewer`] owns a viewport, a scene, an orbit layer, and the interaction
//! controller, and wires them together across activation, events, frames and
//! deactivation. Rendering, orbit motion and model decoding are injected
//! capabilities ([`Renderable`], [`Orbitable`], [`Loadable`]).
//!
//! # Invariants
//! - At most one model is attached to the scene, normalized exactly once.
//! - The manual drag layer rotates the model node; the orbit layer moves
//!   the camera. Neither touches the other's transform.
//! - `model.rotation.x` stays within [-π/2, π/2] after every frame.
//! - Camera aspect matches the container immediately after a resize.
//! - Deactivation releases every window listener, the orbit layer, and the
//!   surface in one step.
//!
//! [`Renderable`]: orbitview_render::Renderable
//! [`Orbitable`]: orbitview_orbit::Orbitable
//! [`Loadable`]: orbitview_assets::Loadable

pub mod config;
pub mod interaction;
pub mod lifecycle;
pub mod loader;
pub mod notify;
pub mod render_loop;
pub mod viewport;

pub use config::{ConfigError, ViewerConfig};
pub use interaction::{DragPhase, InteractionController, PointerState};
pub use lifecycle::{Capabilities, Viewer};
pub use loader::{AssetLoadFailure, AssetLoader, Model};
pub use notify::{LogNotifier, Notifier};
pub use render_loop::RenderLoop;
pub use viewport::Viewport;

pub fn crate_info() -> &'static str {
    "orbitview-viewer v0.1.0"
}
