//! Color model shared between layer data and renderers.
//!
//! The compositor blends with `SrcAlpha`/`OneMinusSrcAlpha`, so colors stay
//! straight-alpha end to end; shaders receive them unmultiplied.

mod color;

pub use color::Color;
