use std::fmt;

use crate::coords::Vec2;
use crate::paint::Color;

use super::params::PatternParams;

/// Stable layer identifier, unique within a project.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Declared compositing intent.
///
/// Only `Normal` is consumed by the render path; the other variants are
/// carried as data so external stores round-trip them unchanged.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
}

/// One pattern layer as read from the project store.
///
/// The engine never mutates these; transform changes during drags are emitted
/// as [`LayerPatch`] updates for the store to apply. List order is paint
/// order, bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternLayer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub color: Color,
    /// World units.
    pub position: Vec2,
    /// Degrees, kept in `[0, 360)` by the interaction machine.
    pub rotation: f32,
    /// `[0, 1]`.
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub params: PatternParams,
}

impl PatternLayer {
    pub fn new(id: LayerId, name: impl Into<String>, params: PatternParams) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            color: Color::WHITE,
            position: Vec2::zero(),
            rotation: 0.0,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            params,
        }
    }
}

/// Partial layer update produced during drags.
///
/// Limited to the transform fields by design; everything else belongs to the
/// external store's own editing surface.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LayerPatch {
    pub position: Option<Vec2>,
    pub rotation: Option<f32>,
}

impl LayerPatch {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none()
    }

    /// Applies the patch to a layer record. Intended for the owning store.
    pub fn apply_to(&self, layer: &mut PatternLayer) {
        if let Some(p) = self.position {
            layer.position = p;
        }
        if let Some(r) = self.rotation {
            layer.rotation = r;
        }
    }
}
