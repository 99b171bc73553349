//! Coordinate types and the screen/world mapping.
//!
//! Conventions:
//! - Screen space is logical pixels, top-left origin, +Y down.
//! - World space is pattern units, same orientation, related to screen space
//!   by `screen = world * zoom + pan`.

mod transform;
mod vec2;
mod viewport;

pub use transform::{ViewTransform, MAX_ZOOM, MIN_ZOOM};
pub use vec2::Vec2;
pub use viewport::Viewport;
