use crate::coords::Vec2;

/// Keyboard key identifier.
///
/// Deliberately small: the pattern canvas consumes modifiers, layer-selection
/// digits and a few editing keys. Unmapped platform keys arrive as
/// `Key::Unknown` with a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,
    Delete,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers as keys (mode feedback updates on press/release)
    Shift,
    Control,
    Alt,
    Meta,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    Unknown(u32),
}

impl Key {
    /// Digit value for layer-selection keys, if this is one.
    pub fn digit(self) -> Option<u32> {
        Some(match self {
            Key::Digit0 => 0,
            Key::Digit1 => 1,
            Key::Digit2 => 2,
            Key::Digit3 => 3,
            Key::Digit4 => 4,
            Key::Digit5 => 5,
            Key::Digit6 => 6,
            Key::Digit7 => 7,
            Key::Digit8 => 8,
            Key::Digit9 => 9,
            _ => return None,
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Current modifier-key state.
///
/// The interaction machine derives its mode purely from this.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Wheel movement as reported by the platform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    /// Discrete wheel notches.
    Line { x: f32, y: f32 },
    /// Smooth scrolling, logical pixels.
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Logical pixels a single wheel notch stands for.
    const LINE_TO_PIXELS: f32 = 40.0;

    /// Normalizes both variants to logical pixels.
    pub fn to_pixels(self) -> Vec2 {
        match self {
            MouseWheelDelta::Line { x, y } => {
                Vec2::new(x * Self::LINE_TO_PIXELS, y * Self::LINE_TO_PIXELS)
            }
            MouseWheelDelta::Pixel { x, y } => Vec2::new(x, y),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input event stream consumed by the canvas app.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Focused(bool),
    PointerMoved(PointerMoveEvent),
    PointerLeft,
    PointerButton(PointerButtonEvent),
    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },
    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        repeat: bool,
    },
}
