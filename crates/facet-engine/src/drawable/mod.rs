//! Drawables: a bind list, a shared per-kind static list, one indexed draw.

mod base;
mod registry;

use glam::Mat4;

use crate::bind::DrawContext;
use crate::error::Result;
use crate::gfx::Graphics;

pub use base::DrawableBase;
pub use registry::{StaticBindRegistry, StaticSlot};

/// Key of the static bind cache. Every instance of one kind shares the same
/// static bindables.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawableKind {
    Cuboid,
    Cylinder,
    Pyramid,
    SkinnedBox,
    SolidSphere,
    AssetMesh,
    ModelMesh,
    /// Kinds defined outside the engine.
    Custom(&'static str),
}

/// An object that knows its own transform and can be drawn.
pub trait Drawable {
    fn base(&self) -> &DrawableBase;

    /// Model-to-world transform for the current frame.
    fn transform(&self) -> Mat4;

    /// Advances animation by `dt` seconds.
    fn update(&mut self, dt: f32) {
        let _ = dt;
    }

    fn draw(&self, gfx: &mut Graphics) -> Result<()> {
        self.base().draw(gfx, &DrawContext::new(self.transform()))
    }
}
