//! Guilloche engine crate.
//!
//! This crate owns the platform + GPU runtime pieces and the pattern
//! rendering/interaction core consumed by the studio binary.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod pattern;
pub mod canvas;
pub mod render;
pub mod interact;
