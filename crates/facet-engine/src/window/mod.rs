//! Window and runtime loop.
//!
//! Owns the `winit` event loop and the window, builds the wgpu-backed
//! [`Graphics`](crate::gfx::Graphics) context for it and drives an
//! [`App`](crate::core::App).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
