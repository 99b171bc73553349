//! Guilloche studio: interactive pattern canvas.
//!
//! Holds the layer store and the view state, feeds input into the engine's
//! interaction machine, and applies the typed updates it emits. Drag with the
//! left button to pan, Alt-drag to move the selected layer, Alt+Shift-drag to
//! rotate it, wheel to zoom at the cursor. Digits 1-9 select a layer by id,
//! 0 deselects, Space toggles the selected layer's visibility, Escape exits.

use anyhow::Result;
use winit::window::CursorIcon;

use guilloche_engine::canvas::{CanvasView, ViewportController};
use guilloche_engine::coords::{Vec2, Viewport};
use guilloche_engine::core::{App, AppControl, FrameCtx};
use guilloche_engine::device::GpuInit;
use guilloche_engine::input::{
    InputEvent, InputState, Key, KeyState, MouseButton, MouseButtonState,
};
use guilloche_engine::interact::{InteractionMachine, InteractionMode, InteractionUpdate};
use guilloche_engine::logging::{init_logging, LoggingConfig};
use guilloche_engine::paint::Color;
use guilloche_engine::pattern::{
    ConcentricParams, ConcentricShape, CurveParams, LayerId, LineParams, PatternLayer,
    PatternParams, TileParams,
};
use guilloche_engine::render::PatternCompositor;
use guilloche_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("guilloche studio starting");

    let config = RuntimeConfig {
        title: "Guilloche Studio".to_string(),
        ..Default::default()
    };

    Runtime::run(config, GpuInit::default(), Studio::new())
}

struct Studio {
    layers: Vec<PatternLayer>,
    selected: Option<LayerId>,

    view: CanvasView,
    viewport_ctl: ViewportController,
    machine: InteractionMachine,
    compositor: PatternCompositor,
}

impl Studio {
    fn new() -> Self {
        Self {
            layers: demo_layers(),
            selected: Some(LayerId(1)),
            view: CanvasView::new(Viewport::new(1280.0, 720.0), Color::from_srgb_u8(16, 18, 24, 255)),
            viewport_ctl: ViewportController::default(),
            machine: InteractionMachine::new(),
            compositor: PatternCompositor::new(),
        }
    }

    fn selected_layer(&self) -> Option<&PatternLayer> {
        self.selected
            .and_then(|id| self.layers.iter().find(|l| l.id == id))
    }

    fn apply_update(&mut self, update: InteractionUpdate) {
        match update {
            InteractionUpdate::Pan(pan) => self.view.transform.pan = pan,
            InteractionUpdate::Zoom { zoom, pan } => {
                self.view.transform.zoom = zoom;
                self.view.transform.pan = pan;
            }
            InteractionUpdate::Layer { id, patch } => {
                if let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) {
                    patch.apply_to(layer);
                }
            }
        }
    }

    /// Digit d selects the layer with `LayerId(d)` (the ids shown in layer
    /// names and logs), independent of paint order; 0 deselects. Digits with
    /// no matching layer leave the selection alone.
    fn select_by_digit(&mut self, digit: u32) {
        if digit == 0 {
            self.selected = None;
            return;
        }
        let id = LayerId(digit);
        if self.layers.iter().any(|l| l.id == id) {
            self.selected = Some(id);
        }
    }

    fn toggle_selected_visibility(&mut self) {
        if let Some(id) = self.selected {
            if let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) {
                layer.visible = !layer.visible;
            }
        }
    }

    fn cursor(&self) -> CursorIcon {
        match self.machine.mode() {
            InteractionMode::Pan if self.machine.dragging() => CursorIcon::Grabbing,
            InteractionMode::Pan => CursorIcon::Grab,
            InteractionMode::MoveLayer => CursorIcon::Move,
            InteractionMode::RotateLayer => CursorIcon::Crosshair,
        }
    }

    fn title(&self) -> String {
        let selection = match self.selected_layer() {
            Some(l) => &l.name,
            None => "none",
        };
        format!(
            "Guilloche Studio — {} — selected: {selection}",
            self.machine.status()
        )
    }
}

impl App for Studio {
    fn on_input(&mut self, event: &InputEvent, state: &InputState) -> AppControl {
        match event {
            InputEvent::ModifiersChanged(m) => self.machine.set_modifiers(*m),

            InputEvent::PointerButton(ev) if ev.button == MouseButton::Left => {
                self.machine.set_modifiers(ev.modifiers);
                match ev.state {
                    MouseButtonState::Pressed => {
                        let selected = self.layers.iter().find(|l| Some(l.id) == self.selected);
                        self.machine.pointer_down(Vec2::new(ev.x, ev.y), selected);
                    }
                    MouseButtonState::Released => self.machine.pointer_up(),
                }
            }

            InputEvent::PointerMoved(ev) => {
                let update = self
                    .machine
                    .pointer_move(Vec2::new(ev.x, ev.y), self.view.transform);
                if let Some(update) = update {
                    self.apply_update(update);
                }
            }

            InputEvent::PointerLeft => self.machine.pointer_up(),

            InputEvent::MouseWheel { delta, modifiers } => {
                self.machine.set_modifiers(*modifiers);
                let anchor = state.pointer_pos.unwrap_or(self.view.viewport.center());
                let update = self
                    .machine
                    .wheel(delta.to_pixels().y, anchor, self.view.transform);
                self.apply_update(update);
            }

            InputEvent::Key {
                key,
                state: KeyState::Pressed,
                modifiers,
                repeat: false,
            } => {
                self.machine.set_modifiers(*modifiers);
                match key {
                    Key::Escape => return AppControl::Exit,
                    Key::Space => self.toggle_selected_visibility(),
                    k => {
                        if let Some(d) = k.digit() {
                            self.select_by_digit(d);
                        }
                    }
                }
            }

            InputEvent::Key { modifiers, .. } => self.machine.set_modifiers(*modifiers),

            InputEvent::Focused(false) => self.machine.pointer_up(),

            _ => {}
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (w, h) = ctx.window.logical_size();
        self.viewport_ctl
            .resized(&mut self.view, Viewport::new(w, h));

        ctx.window.set_cursor(self.cursor());
        ctx.window.set_title(&self.title());

        let background = self.view.background;
        let layers = &self.layers;
        let view = &self.view;
        let compositor = &mut self.compositor;

        ctx.render(background, |rctx, target| {
            compositor.render(rctx, target, layers, view);
        })
    }
}

/// Starting layer stack: one of each pattern family, tinted so overlaps read.
fn demo_layers() -> Vec<PatternLayer> {
    let mut rings = PatternLayer::new(
        LayerId(1),
        "rings",
        PatternParams::Concentric(ConcentricParams {
            shape: ConcentricShape::Circle,
            spacing: 26.0,
            thickness: 1.4,
            phase: 0.0,
            count: 160,
            offset: Vec2::new(1.6, 0.4),
            rotation_offset: 0.0,
        }),
    );
    rings.color = Color::from_srgb_u8(96, 178, 255, 255);

    let mut hexes = PatternLayer::new(
        LayerId(2),
        "hexes",
        PatternParams::Concentric(ConcentricParams {
            shape: ConcentricShape::Polygon { sides: 6 },
            spacing: 42.0,
            thickness: 1.2,
            phase: 8.0,
            count: 64,
            offset: Vec2::zero(),
            rotation_offset: 2.5,
        }),
    );
    hexes.color = Color::from_srgb_u8(255, 170, 80, 255);
    hexes.position = Vec2::new(220.0, -40.0);
    hexes.opacity = 0.8;

    let mut hatch = PatternLayer::new(
        LayerId(3),
        "hatch",
        PatternParams::Line(LineParams {
            angle: 30.0,
            spacing: 18.0,
            thickness: 0.9,
            phase: 0.0,
        }),
    );
    hatch.color = Color::from_srgb_u8(130, 220, 160, 255);
    hatch.opacity = 0.5;

    let mut grid = PatternLayer::new(
        LayerId(4),
        "grid",
        PatternParams::Tile(TileParams {
            angle: 0.0,
            spacing: 96.0,
            thickness: 0.7,
            phase: 0.0,
        }),
    );
    grid.color = Color::from_srgb_u8(90, 90, 110, 255);
    grid.opacity = 0.6;

    let mut waves = PatternLayer::new(
        LayerId(5),
        "waves",
        PatternParams::Curve(CurveParams {
            angle: 0.0,
            spacing: 34.0,
            thickness: 1.1,
            phase: 0.0,
            amplitude: 9.0,
            wavelength: 140.0,
        }),
    );
    waves.color = Color::from_srgb_u8(230, 120, 200, 255);
    waves.position = Vec2::new(-120.0, 160.0);
    waves.rotation = 12.0;
    waves.opacity = 0.7;

    // Paint order bottom to top.
    vec![grid, hatch, waves, hexes, rings]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_selection_matches_layer_ids() {
        let mut studio = Studio::new();
        // Initial selection and digit 1 agree on the same layer.
        assert_eq!(studio.selected, Some(LayerId(1)));

        studio.select_by_digit(4);
        assert_eq!(studio.selected_layer().map(|l| l.name.as_str()), Some("grid"));

        // Unmapped digit keeps the selection; 0 clears it.
        studio.select_by_digit(9);
        assert_eq!(studio.selected, Some(LayerId(4)));
        studio.select_by_digit(0);
        assert_eq!(studio.selected, None);
    }

    #[test]
    fn layer_patch_applies_to_store() {
        let mut studio = Studio::new();
        studio.apply_update(InteractionUpdate::Layer {
            id: LayerId(2),
            patch: guilloche_engine::pattern::LayerPatch {
                position: Some(Vec2::new(10.0, -5.0)),
                rotation: None,
            },
        });
        let hexes = studio.layers.iter().find(|l| l.id == LayerId(2)).unwrap();
        assert_eq!(hexes.position, Vec2::new(10.0, -5.0));
    }
}
