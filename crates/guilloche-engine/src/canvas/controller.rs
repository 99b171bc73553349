use crate::coords::{Vec2, ViewTransform, Viewport};

use super::CanvasView;

/// Zoom rate per wheel pixel. `exp(-delta * rate)` gives smooth, symmetric
/// zoom in both directions.
const WHEEL_ZOOM_RATE: f32 = 0.001;

/// Wheel-zoom and resize handling for a [`CanvasView`].
///
/// Stateless; all state lives in the view itself.
#[derive(Debug, Default)]
pub struct ViewportController;

impl ViewportController {
    /// Applies a wheel tick, zooming about the cursor position so the world
    /// point under it stays put.
    ///
    /// `wheel_dy` is in (logical) pixels, +down; scrolling up zooms in.
    pub fn wheel_zoom(&self, view: ViewTransform, wheel_dy: f32, anchor: Vec2) -> ViewTransform {
        let target = view.zoom * (-wheel_dy * WHEEL_ZOOM_RATE).exp();
        view.zoom_at_point(target, anchor)
    }

    /// Records a new logical viewport size. Zoom and pan are untouched; the
    /// surface reconfiguration in physical pixels is the device layer's job.
    pub fn resized(&self, view: &mut CanvasView, viewport: Viewport) {
        if viewport.is_valid() {
            view.viewport = viewport;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{MAX_ZOOM, MIN_ZOOM};
    use crate::paint::Color;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn wheel_zoom_keeps_anchor_world_point() {
        let ctl = ViewportController;
        let view = ViewTransform::new(1.0, Vec2::new(30.0, -12.0));
        let anchor = Vec2::new(400.0, 300.0);
        let before = view.screen_to_world(anchor);

        let zoomed = ctl.wheel_zoom(view, -250.0, anchor);
        assert!(zoomed.zoom > view.zoom);
        assert!(close(zoomed.screen_to_world(anchor), before));
    }

    #[test]
    fn wheel_zoom_at_pan_reference_point_leaves_pan_unchanged() {
        // Anchoring at the screen point the pan maps world origin to means
        // pan is exactly the fixed point of the zoom.
        let ctl = ViewportController;
        let view = ViewTransform::new(1.0, Vec2::new(120.0, 80.0));
        let zoomed = ctl.wheel_zoom(view, -(1.2f32.ln() / 0.001), view.pan);
        assert!((zoomed.zoom - 1.2).abs() < 1e-3);
        assert!(close(zoomed.pan, view.pan));
    }

    #[test]
    fn wheel_zoom_clamps_to_bounds() {
        let ctl = ViewportController;
        let view = ViewTransform::new(9.5, Vec2::zero());
        assert_eq!(ctl.wheel_zoom(view, -10_000.0, Vec2::zero()).zoom, MAX_ZOOM);

        let view = ViewTransform::new(0.12, Vec2::zero());
        assert_eq!(ctl.wheel_zoom(view, 10_000.0, Vec2::zero()).zoom, MIN_ZOOM);
    }

    #[test]
    fn resized_ignores_degenerate_sizes() {
        let ctl = ViewportController;
        let mut view = CanvasView::new(Viewport::new(800.0, 600.0), Color::BLACK);
        ctl.resized(&mut view, Viewport::new(0.0, 600.0));
        assert_eq!(view.viewport, Viewport::new(800.0, 600.0));
        ctl.resized(&mut view, Viewport::new(1024.0, 768.0));
        assert_eq!(view.viewport, Viewport::new(1024.0, 768.0));
    }
}
