use crate::coords::{ViewTransform, Viewport};
use crate::paint::Color;

/// Mutable view state of the pattern canvas.
///
/// Mutated only through [`ViewportController`](super::ViewportController) and
/// the interaction machine's updates; the compositor reads it as a snapshot
/// each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasView {
    /// Zoom + pan. Pan is in logical screen pixels.
    pub transform: ViewTransform,
    /// Frame clear color.
    pub background: Color,
    /// Logical viewport; the surface backing store is this times the window
    /// scale factor.
    pub viewport: Viewport,
}

impl CanvasView {
    pub fn new(viewport: Viewport, background: Color) -> Self {
        Self {
            transform: ViewTransform::default(),
            background,
            viewport,
        }
    }

    /// Radius of the visible area in world units, used to bound concentric
    /// ring scans.
    #[inline]
    pub fn world_radius(&self) -> f32 {
        self.viewport.radius() / self.transform.zoom
    }
}
