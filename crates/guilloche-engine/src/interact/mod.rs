//! Pointer/keyboard gesture interpretation.
//!
//! The machine turns raw pointer events plus modifier state into typed
//! pan/zoom/layer-transform updates, sharing the coordinate math in
//! [`coords`](crate::coords) with the renderer.

mod machine;
mod mode;
mod session;

pub use machine::{InteractionMachine, InteractionUpdate, POSITION_LIMIT, ROTATE_DEGREES_PER_PIXEL};
pub use mode::{normalize_rotation, InteractionMode};
