//! Window-level input: the events a host forwards to the viewer, and the
//! registry that records which window listeners the viewer currently holds.
//!
//! # Invariants
//! - Hosts translate platform events into [`InputEvent`] before delivery.
//! - A listener id is live from `register` until `remove`; ids are never reused.

pub mod event;
pub mod listener;

pub use event::{InputEvent, PointerButton};
pub use listener::{ListenerError, ListenerId, ListenerKind, ListenerRegistry};
