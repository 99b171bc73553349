use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for the canvas window.
///
/// Holds "is down" information and the current pointer position; the
/// interaction machine consumes events, this type answers point-in-time
/// queries.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels, `None` while outside the window.
    pub pointer_pos: Option<Vec2>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // On focus loss, clear "down" sets. Avoids stuck keys and
                    // buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                modifiers,
            }) => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_loss_clears_held_sets() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::Key {
            key: Key::Alt,
            state: KeyState::Pressed,
            modifiers: Modifiers {
                alt: true,
                ..Default::default()
            },
            repeat: false,
        });
        s.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 10.0,
            y: 10.0,
            modifiers: s.modifiers,
        }));
        assert!(s.key_down(Key::Alt));
        assert!(s.button_down(MouseButton::Left));

        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.key_down(Key::Alt));
        assert!(!s.button_down(MouseButton::Left));
    }

    #[test]
    fn wheel_updates_modifiers() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::MouseWheel {
            delta: super::super::MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: Modifiers {
                shift: true,
                ..Default::default()
            },
        });
        assert!(s.modifiers.shift);
    }
}
