//! Shared value types: transforms, bounds, geometry, and surface sizes.
//!
//! Everything here is plain data. No crate in the workspace stores a
//! reference into these types across frames.

mod types;

pub use types::{Aabb, Color, Mesh, NodeId, PixelSize, Transform};
