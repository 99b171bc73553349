use crate::canvas::ViewportController;
use crate::coords::{Vec2, ViewTransform};
use crate::input::Modifiers;
use crate::pattern::{LayerId, LayerPatch, PatternLayer};

use super::mode::{normalize_rotation, InteractionMode};
use super::session::{DragSession, LayerSnapshot};

/// Layer positions are clamped to this many world units from the origin on
/// each axis during drags.
pub const POSITION_LIMIT: f32 = 2000.0;

/// Rotation sensitivity: degrees per pixel of vertical drag, upward drag
/// rotating positive.
pub const ROTATE_DEGREES_PER_PIXEL: f32 = 0.5;

/// Typed update emitted toward the owning store.
///
/// These are the engine's outbound "callbacks": the store applies them and
/// the next frame renders the result.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InteractionUpdate {
    /// New pan vector (screen units).
    Pan(Vec2),
    /// New zoom plus the pan recomputed to hold the anchor point.
    Zoom { zoom: f32, pan: Vec2 },
    /// Partial transform patch for one layer.
    Layer { id: LayerId, patch: LayerPatch },
}

/// Disambiguates pan vs. layer-move vs. layer-rotate drags.
///
/// Single-threaded and synchronous: each handler consumes one event and
/// returns at most one update. The idle mode tracks the held modifiers; a
/// drag freezes its mode at pointer-down.
#[derive(Debug, Default)]
pub struct InteractionMachine {
    modifiers: Modifiers,
    idle_mode: InteractionMode,
    session: Option<DragSession>,
    viewport: ViewportController,
}

impl InteractionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective mode: the frozen drag mode while dragging, otherwise the
    /// modifier-derived idle mode.
    pub fn mode(&self) -> InteractionMode {
        match &self.session {
            Some(s) => s.mode,
            None => self.idle_mode,
        }
    }

    pub fn dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Human-readable mode/status line for external display.
    pub fn status(&self) -> &'static str {
        self.mode().status()
    }

    /// Records the modifier state. Outside a drag this immediately retargets
    /// the idle mode (cursor/status feedback before any click).
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
        if self.session.is_none() {
            self.idle_mode = InteractionMode::from_modifiers(modifiers);
        }
    }

    /// Begins a drag at `pos` (screen units).
    ///
    /// For layer modes the selected layer's transform is snapshotted; with no
    /// selection the mode still activates but the drag mutates nothing.
    pub fn pointer_down(&mut self, pos: Vec2, selected: Option<&PatternLayer>) {
        let mode = InteractionMode::from_modifiers(self.modifiers);
        let layer = if mode.is_layer_mode() {
            selected.map(|l| LayerSnapshot {
                id: l.id,
                position: l.position,
                rotation: l.rotation,
            })
        } else {
            None
        };

        self.idle_mode = mode;
        self.session = Some(DragSession {
            mode,
            last_pointer: pos,
            layer,
        });
    }

    /// Feeds a pointer position. While dragging, returns the update the
    /// gesture produces; otherwise only refreshes the idle mode.
    pub fn pointer_move(&mut self, pos: Vec2, view: ViewTransform) -> Option<InteractionUpdate> {
        let Some(session) = self.session.as_mut() else {
            self.idle_mode = InteractionMode::from_modifiers(self.modifiers);
            return None;
        };

        let delta = pos - session.last_pointer;
        session.last_pointer = pos;

        match session.mode {
            // Raw screen-space pan: one screen pixel per pixel of drag,
            // independent of zoom.
            InteractionMode::Pan => Some(InteractionUpdate::Pan(view.pan + delta)),

            InteractionMode::MoveLayer => session.layer.as_mut().map(|snap| {
                let world_delta = view.screen_delta_to_world_delta(delta);
                snap.position = (snap.position + world_delta).clamped_abs(POSITION_LIMIT);
                InteractionUpdate::Layer {
                    id: snap.id,
                    patch: LayerPatch {
                        position: Some(snap.position),
                        rotation: None,
                    },
                }
            }),

            // Only vertical movement rotates.
            InteractionMode::RotateLayer => session.layer.as_mut().map(|snap| {
                snap.rotation =
                    normalize_rotation(snap.rotation - delta.y * ROTATE_DEGREES_PER_PIXEL);
                InteractionUpdate::Layer {
                    id: snap.id,
                    patch: LayerPatch {
                        position: None,
                        rotation: Some(snap.rotation),
                    },
                }
            }),
        }
    }

    /// Ends the drag. The idle mode is recomputed from whatever modifiers are
    /// still held, so the correct cursor shows immediately after release.
    pub fn pointer_up(&mut self) {
        self.session = None;
        self.idle_mode = InteractionMode::from_modifiers(self.modifiers);
    }

    /// Wheel-zoom anchored at the cursor position.
    pub fn wheel(
        &self,
        wheel_dy_px: f32,
        anchor: Vec2,
        view: ViewTransform,
    ) -> InteractionUpdate {
        let zoomed = self.viewport.wheel_zoom(view, wheel_dy_px, anchor);
        InteractionUpdate::Zoom {
            zoom: zoomed.zoom,
            pan: zoomed.pan,
        }
    }
}
