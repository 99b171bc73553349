use crate::input::Modifiers;

/// Interaction mode, a pure function of the held modifier keys.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum InteractionMode {
    #[default]
    Pan,
    MoveLayer,
    RotateLayer,
}

impl InteractionMode {
    /// Precedence: rotate beats move beats pan.
    pub fn from_modifiers(m: Modifiers) -> Self {
        if m.alt && m.shift {
            InteractionMode::RotateLayer
        } else if m.alt {
            InteractionMode::MoveLayer
        } else {
            InteractionMode::Pan
        }
    }

    #[inline]
    pub fn is_layer_mode(self) -> bool {
        matches!(self, InteractionMode::MoveLayer | InteractionMode::RotateLayer)
    }

    /// Human-readable mode line for external display.
    pub fn status(self) -> &'static str {
        match self {
            InteractionMode::Pan => "Pan — drag to scroll, wheel to zoom",
            InteractionMode::MoveLayer => "Move layer — drag to reposition (Alt)",
            InteractionMode::RotateLayer => "Rotate layer — drag vertically (Alt+Shift)",
        }
    }
}

/// Wraps a rotation in degrees into `[0, 360)`.
#[inline]
pub fn normalize_rotation(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(alt: bool, shift: bool) -> Modifiers {
        Modifiers {
            alt,
            shift,
            ..Default::default()
        }
    }

    #[test]
    fn mode_precedence() {
        assert_eq!(
            InteractionMode::from_modifiers(mods(true, true)),
            InteractionMode::RotateLayer
        );
        assert_eq!(
            InteractionMode::from_modifiers(mods(true, false)),
            InteractionMode::MoveLayer
        );
        assert_eq!(
            InteractionMode::from_modifiers(mods(false, false)),
            InteractionMode::Pan
        );
        // Shift alone is not a layer gesture.
        assert_eq!(
            InteractionMode::from_modifiers(mods(false, true)),
            InteractionMode::Pan
        );
    }

    #[test]
    fn normalize_rotation_wraps_both_directions() {
        assert_eq!(normalize_rotation(-10.0), 350.0);
        assert_eq!(normalize_rotation(370.0), 10.0);
        assert_eq!(normalize_rotation(360.0), 0.0);
        for deg in [-720.5f32, -1.0, 0.0, 359.9, 1234.5] {
            let n = normalize_rotation(deg);
            assert!((0.0..360.0).contains(&n), "{deg} normalized to {n}");
        }
    }
}
