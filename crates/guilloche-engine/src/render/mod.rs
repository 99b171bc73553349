//! GPU rendering subsystem.
//!
//! The compositor consumes the per-frame layer snapshot and issues wgpu
//! commands; pipelines are owned by the cache and shared read-only.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Shaders reconstruct world-space coordinates from the uniform block and
//!   evaluate the same distance fields as [`pattern::field`](crate::pattern::field).

mod compositor;
mod ctx;
mod error;
mod pipeline;

pub use compositor::PatternCompositor;
pub use ctx::{RenderCtx, RenderTarget};
pub use error::ShaderError;
pub use pipeline::{PipelineCache, ShaderFamily};
