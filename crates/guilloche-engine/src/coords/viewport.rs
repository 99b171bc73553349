/// Viewport size in logical pixels.
///
/// The window runtime keeps this in pre-scaling (logical) units; the surface
/// backing store is `logical * scale_factor`. Zoom/pan math never sees
/// physical pixels, so behavior is independent of display density.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Radius of the circumscribing circle, used to bound concentric ring
    /// scans to what can actually be visible.
    #[inline]
    pub fn radius(self) -> f32 {
        0.5 * (self.width * self.width + self.height * self.height).sqrt()
    }

    #[inline]
    pub fn center(self) -> crate::coords::Vec2 {
        crate::coords::Vec2::new(0.5 * self.width, 0.5 * self.height)
    }
}
