//! Contract between the runtime loop and applications.
//!
//! An [`App`] is started once the window and its [`Graphics`](crate::gfx::Graphics)
//! context exist, then receives window events and one [`FrameCtx`] per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
