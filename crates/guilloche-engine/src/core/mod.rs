//! Engine-facing contracts.
//!
//! The stable interface between the platform runtime and the application:
//! typed input events in, one render callback per presented frame. Runtime
//! internals (winit, surface plumbing) never leak through here.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
