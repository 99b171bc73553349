use super::Vec2;

/// Zoom factor bounds shared by the transform, the viewport controller and
/// the interaction machine.
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Screen/world mapping: `screen = world * zoom + pan`.
///
/// `pan` is in screen (logical pixel) units, `zoom` is unitless and clamped
/// to `[MIN_ZOOM, MAX_ZOOM]` by every constructor/mutator. The type is a
/// plain value; the renderer and the interaction machine share the same
/// instance semantics by copying it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransform {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::zero(),
        }
    }
}

impl ViewTransform {
    #[inline]
    pub fn new(zoom: f32, pan: Vec2) -> Self {
        Self {
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            pan,
        }
    }

    #[inline]
    pub fn screen_to_world(self, p: Vec2) -> Vec2 {
        (p - self.pan) / self.zoom
    }

    #[inline]
    pub fn world_to_screen(self, p: Vec2) -> Vec2 {
        p * self.zoom + self.pan
    }

    /// Converts a screen-space drag delta into a world-space delta.
    #[inline]
    pub fn screen_delta_to_world_delta(self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Returns a transform at `new_zoom` whose pan is recomputed so the world
    /// point under `anchor` (screen space) is unchanged by the zoom.
    #[inline]
    pub fn zoom_at_point(self, new_zoom: f32, anchor: Vec2) -> ViewTransform {
        let new_zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let world = self.screen_to_world(anchor);
        ViewTransform {
            zoom: new_zoom,
            pan: anchor - world * new_zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn round_trip_identity_view() {
        let v = ViewTransform::default();
        let p = Vec2::new(123.5, -77.25);
        assert!(close(v.world_to_screen(v.screen_to_world(p)), p));
    }

    #[test]
    fn round_trip_arbitrary_views() {
        let views = [
            ViewTransform::new(0.1, Vec2::new(900.0, -300.0)),
            ViewTransform::new(2.5, Vec2::new(-15.0, 42.0)),
            ViewTransform::new(10.0, Vec2::new(0.25, 0.75)),
        ];
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(640.0, 360.0),
            Vec2::new(-1000.0, 999.0),
        ];
        for v in views {
            for p in points {
                assert!(close(v.world_to_screen(v.screen_to_world(p)), p));
                assert!(close(v.screen_to_world(v.world_to_screen(p)), p));
            }
        }
    }

    #[test]
    fn zoom_at_point_preserves_anchor_world_point() {
        let v = ViewTransform::new(1.0, Vec2::new(40.0, -10.0));
        let anchor = Vec2::new(512.0, 384.0);
        let before = v.screen_to_world(anchor);

        for target in [0.1f32, 0.5, 1.2, 4.0, 10.0] {
            let zoomed = v.zoom_at_point(target, anchor);
            let after = zoomed.screen_to_world(anchor);
            assert!(close(before, after), "anchor drifted at zoom {target}");
        }
    }

    #[test]
    fn zoom_clamped_to_bounds() {
        let v = ViewTransform::new(1.0, Vec2::zero());
        assert_eq!(v.zoom_at_point(0.001, Vec2::zero()).zoom, MIN_ZOOM);
        assert_eq!(v.zoom_at_point(1e6, Vec2::zero()).zoom, MAX_ZOOM);
        assert_eq!(ViewTransform::new(50.0, Vec2::zero()).zoom, MAX_ZOOM);
    }

    #[test]
    fn screen_delta_scales_inverse_to_zoom() {
        let v = ViewTransform::new(4.0, Vec2::new(5.0, 5.0));
        let d = v.screen_delta_to_world_delta(Vec2::new(8.0, -2.0));
        assert!(close(d, Vec2::new(2.0, -0.5)));
    }
}
