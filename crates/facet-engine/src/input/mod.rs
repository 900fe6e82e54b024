//! Input subsystem.
//!
//! The public API does not expose winit types. The runtime translates window
//! events into [`InputEvent`]s and feeds them to an [`InputState`], which keeps
//! held keys and records per-frame transitions into an [`InputFrame`].

mod frame;
mod state;
mod types;
mod platform;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

pub(crate) use platform::translate_window_event;
