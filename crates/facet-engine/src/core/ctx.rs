use winit::window::{Window, WindowId};

use crate::error::Result;
use crate::gfx::{FrameStatus, Graphics};
use crate::input::{InputFrame, InputState};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// The window being driven.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    /// Physical size in pixels.
    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
pub struct FrameCtx<'a> {
    pub window: WindowCtx<'a>,
    pub gfx: &'a mut Graphics,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_> {
    /// Clears the backbuffer, runs `draw`, then presents.
    ///
    /// A failing `draw` or present is logged and ends the application.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&mut Graphics) -> Result<()>,
    {
        self.gfx.begin_frame();
        if let Err(err) = draw(self.gfx) {
            log::error!("frame {} failed: {err}", self.time.frame);
            return AppControl::Exit;
        }

        self.window.window.pre_present_notify();
        match self.gfx.end_frame() {
            Ok(FrameStatus::Presented) => AppControl::Continue,
            Ok(FrameStatus::Skipped) => {
                log::debug!("frame {} skipped", self.time.frame);
                AppControl::Continue
            }
            Err(err) => {
                log::error!("present failed: {err}");
                AppControl::Exit
            }
        }
    }
}
