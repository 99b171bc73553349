use crate::input::{InputEvent, InputState};

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the studio layer.
pub trait App {
    /// Called for each translated input event, before the frame it lands in.
    ///
    /// `state` reflects the event already applied.
    fn on_input(&mut self, event: &InputEvent, state: &InputState) -> AppControl {
        let _ = (event, state);
        AppControl::Continue
    }

    /// Called once per presented frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
