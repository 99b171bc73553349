//! GPU device + surface management.
//!
//! Responsibilities:
//! - create the wgpu Instance/Adapter/Device/Queue (exactly once, owned here)
//! - create & configure the Surface (swapchain) in physical pixels
//! - acquire frames, provide encoders/views, triage surface errors

mod error;
mod gpu;

pub use error::DeviceError;
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
