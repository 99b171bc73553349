use thiserror::Error;

use crate::coords::Vec2;

/// Parameter validation failure for a single layer.
///
/// These never abort a frame; the compositor logs and skips the layer.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("spacing must be positive, got {0}")]
    NonPositiveSpacing(f32),
    #[error("thickness must be non-negative, got {0}")]
    NegativeThickness(f32),
    #[error("wavelength must be positive, got {0}")]
    NonPositiveWavelength(f32),
    #[error("polygon needs at least 3 sides, got {0}")]
    TooFewSides(u32),
    #[error("{0} is not finite")]
    NonFinite(&'static str),
}

/// Concentric base shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConcentricShape {
    Circle,
    /// Chebyshev metric: rings are axis-aligned squares.
    Square,
    Triangle,
    Polygon { sides: u32 },
}

impl ConcentricShape {
    /// `(shape_type, sides)` as packed into the uniform block.
    ///
    /// 0 = circle, 1 = square, 2 = regular polygon (triangle is the 3-sided
    /// polygon). `sides` is 0 where not applicable.
    pub fn uniform_encoding(self) -> (u32, u32) {
        match self {
            ConcentricShape::Circle => (0, 0),
            ConcentricShape::Square => (1, 0),
            ConcentricShape::Triangle => (2, 3),
            ConcentricShape::Polygon { sides } => (2, sides),
        }
    }
}

/// Straight line family: periodic parallel stripes.
///
/// Angles are degrees throughout the data model; evaluation converts once.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineParams {
    pub angle: f32,
    pub spacing: f32,
    pub thickness: f32,
    pub phase: f32,
}

/// Concentric family: repeated rings of one base shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConcentricParams {
    pub shape: ConcentricShape,
    pub spacing: f32,
    pub thickness: f32,
    pub phase: f32,
    /// Number of rings, index 0 at `phase`.
    pub count: u32,
    /// Per-ring center drift in world units. Non-zero values disable the
    /// analytic nearest-ring shortcut (rings stop being evenly spaced).
    pub offset: Vec2,
    /// Per-ring rotation in degrees.
    pub rotation_offset: f32,
}

impl ConcentricParams {
    /// Whether the per-ring offset terms are effectively zero, enabling the
    /// windowed fast path.
    #[inline]
    pub fn has_ring_offset(&self) -> bool {
        self.offset.length() > super::field::OFFSET_EPSILON
            || self.rotation_offset.abs() > super::field::OFFSET_EPSILON
    }
}

/// Tile family: two perpendicular stripe fields forming a grid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileParams {
    pub angle: f32,
    pub spacing: f32,
    pub thickness: f32,
    pub phase: f32,
}

/// Curve family: sinusoidally displaced stripes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CurveParams {
    pub angle: f32,
    pub spacing: f32,
    pub thickness: f32,
    pub phase: f32,
    pub amplitude: f32,
    pub wavelength: f32,
}

/// Category-tagged pattern parameters.
///
/// Each variant carries only its applicable fields; there is deliberately no
/// shared numeric bag with per-read defaulting.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PatternParams {
    Line(LineParams),
    Concentric(ConcentricParams),
    Tile(TileParams),
    Curve(CurveParams),
}

impl PatternParams {
    pub fn spacing(&self) -> f32 {
        match self {
            PatternParams::Line(p) => p.spacing,
            PatternParams::Concentric(p) => p.spacing,
            PatternParams::Tile(p) => p.spacing,
            PatternParams::Curve(p) => p.spacing,
        }
    }

    pub fn thickness(&self) -> f32 {
        match self {
            PatternParams::Line(p) => p.thickness,
            PatternParams::Concentric(p) => p.thickness,
            PatternParams::Tile(p) => p.thickness,
            PatternParams::Curve(p) => p.thickness,
        }
    }

    /// Checks the numeric preconditions the shaders rely on.
    pub fn validate(&self) -> Result<(), ParamError> {
        let spacing = self.spacing();
        if !spacing.is_finite() {
            return Err(ParamError::NonFinite("spacing"));
        }
        if spacing <= 0.0 {
            return Err(ParamError::NonPositiveSpacing(spacing));
        }

        let thickness = self.thickness();
        if !thickness.is_finite() {
            return Err(ParamError::NonFinite("thickness"));
        }
        if thickness < 0.0 {
            return Err(ParamError::NegativeThickness(thickness));
        }

        match self {
            PatternParams::Line(p) => {
                if !(p.angle.is_finite() && p.phase.is_finite()) {
                    return Err(ParamError::NonFinite("angle/phase"));
                }
            }
            PatternParams::Concentric(p) => {
                if !(p.phase.is_finite() && p.rotation_offset.is_finite()) {
                    return Err(ParamError::NonFinite("phase/rotation_offset"));
                }
                if !p.offset.is_finite() {
                    return Err(ParamError::NonFinite("offset"));
                }
                if let ConcentricShape::Polygon { sides } = p.shape {
                    if sides < 3 {
                        return Err(ParamError::TooFewSides(sides));
                    }
                }
            }
            PatternParams::Tile(p) => {
                if !(p.angle.is_finite() && p.phase.is_finite()) {
                    return Err(ParamError::NonFinite("angle/phase"));
                }
            }
            PatternParams::Curve(p) => {
                if !(p.angle.is_finite() && p.phase.is_finite() && p.amplitude.is_finite()) {
                    return Err(ParamError::NonFinite("angle/phase/amplitude"));
                }
                if !p.wavelength.is_finite() {
                    return Err(ParamError::NonFinite("wavelength"));
                }
                if p.wavelength <= 0.0 {
                    return Err(ParamError::NonPositiveWavelength(p.wavelength));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(spacing: f32, thickness: f32) -> PatternParams {
        PatternParams::Line(LineParams {
            angle: 0.0,
            spacing,
            thickness,
            phase: 0.0,
        })
    }

    #[test]
    fn validate_rejects_zero_spacing() {
        assert_eq!(
            line(0.0, 1.0).validate(),
            Err(ParamError::NonPositiveSpacing(0.0))
        );
    }

    #[test]
    fn validate_rejects_nan() {
        assert_eq!(
            line(f32::NAN, 1.0).validate(),
            Err(ParamError::NonFinite("spacing"))
        );
    }

    #[test]
    fn validate_rejects_degenerate_polygon() {
        let p = PatternParams::Concentric(ConcentricParams {
            shape: ConcentricShape::Polygon { sides: 2 },
            spacing: 10.0,
            thickness: 1.0,
            phase: 0.0,
            count: 10,
            offset: Vec2::zero(),
            rotation_offset: 0.0,
        });
        assert_eq!(p.validate(), Err(ParamError::TooFewSides(2)));
    }

    #[test]
    fn validate_accepts_reasonable_params() {
        assert!(line(20.0, 1.5).validate().is_ok());
    }

    #[test]
    fn ring_offset_detection_uses_both_terms() {
        let mut p = ConcentricParams {
            shape: ConcentricShape::Circle,
            spacing: 10.0,
            thickness: 1.0,
            phase: 0.0,
            count: 10,
            offset: Vec2::zero(),
            rotation_offset: 0.0,
        };
        assert!(!p.has_ring_offset());
        p.offset = Vec2::new(0.5, 0.0);
        assert!(p.has_ring_offset());
        p.offset = Vec2::zero();
        p.rotation_offset = 1.0;
        assert!(p.has_ring_offset());
    }
}
