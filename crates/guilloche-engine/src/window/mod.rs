//! Platform window runtime.
//!
//! Owns the winit event loop and the single canvas window, translates
//! platform events into the crate's input types, and drives the per-frame
//! [`App`](crate::core::App) callbacks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
