//! Canvas view state and the viewport controller.

mod controller;
mod view;

pub use controller::ViewportController;
pub use view::CanvasView;
