//! Orbit layer: continuous, damped camera motion around a pivot.
//!
//! # Invariants
//! - The orbit layer moves the camera only; it never touches scene nodes.
//! - The polar angle stays within the configured range, so the camera
//!   cannot dip below the horizon or flip over the pole.
//! - Input received after `dispose` is ignored.

mod controls;

pub use controls::{OrbitControls, OrbitSettings, Orbitable};
