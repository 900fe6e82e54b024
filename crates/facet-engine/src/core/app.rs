use winit::event::WindowEvent;

use crate::gfx::Graphics;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by the runtime.
pub trait App {
    /// Called once, after the graphics context is ready and before the first
    /// frame. Create drawables here. An error stops the runtime.
    fn on_start(&mut self, gfx: &mut Graphics) -> anyhow::Result<()>;

    /// Raw window events, after the runtime updated its input state.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
