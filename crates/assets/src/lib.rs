//! Model-loading capability: fetch (from disk or over HTTP) and decode one
//! model off the event context, delivering progress and a single terminal result over a channel.
//!
//! # Invariants
//! - Every load yields exactly one terminal event: `Loaded` or `Failed`.
//! - A [`ModelGraph`] is expressed in model-local space; node transforms from
//!   the source file are already baked into its meshes.
//! - Decoding never touches the scene. Results are applied by whoever polls
//!   the [`LoadHandle`].

mod error;
mod gltf_loader;
mod handle;
mod memory;
mod model;
mod remote;
mod source;

pub use error::LoadError;
pub use gltf_loader::GltfLoader;
pub use handle::{LoadEvent, LoadHandle, LoadSender};
pub use memory::MemoryLoader;
pub use model::ModelGraph;
pub use source::{ModelSource, resolve_location};

/// Model-loading capability.
pub trait Loadable {
    /// Start loading the model at `location`. Returns immediately.
    fn load(&self, location: &str) -> LoadHandle;
}

pub fn crate_info() -> &'static str {
    "orbitview-assets v0.1.0"
}
