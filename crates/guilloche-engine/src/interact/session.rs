use crate::coords::Vec2;
use crate::pattern::LayerId;

use super::mode::InteractionMode;

/// Transform snapshot of the layer being manipulated.
///
/// Deltas accumulate onto this snapshot rather than the live layer value, so
/// the final transform depends only on `{snapshot, total delta}` and not on
/// how the pointer-move stream was chunked.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct LayerSnapshot {
    pub id: LayerId,
    pub position: Vec2,
    pub rotation: f32,
}

/// Ephemeral drag state: created on pointer-down, destroyed on pointer-up.
/// The mode is fixed for the whole drag even if modifiers change mid-gesture.
#[derive(Debug)]
pub(super) struct DragSession {
    pub mode: InteractionMode,
    pub last_pointer: Vec2,
    /// Present only for layer modes with a selected layer. A layer mode with
    /// no selection still drags (for cursor feedback) but mutates nothing.
    pub layer: Option<LayerSnapshot>,
}
