use glam::Mat4;

use crate::error::Result;
use crate::gfx::Graphics;

use super::{Bindable, BindableKind, ConstantBuffer, DrawContext};

/// Vertex slot the transforms are always bound to.
pub const TRANSFORM_SLOT: u32 = 0;

/// Matrices uploaded before each draw.
///
/// Stored column by column, which is what WGSL's `mat4x4<f32>` reads; the
/// shaders compute `m * vec4(pos, 1.0)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Transforms {
    pub model_view: [[f32; 4]; 4],
    pub model_view_proj: [[f32; 4]; 4],
}

impl Transforms {
    pub fn compute(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        let model_view = view * model;
        Self {
            model_view: gpu_layout(model_view),
            model_view_proj: gpu_layout(projection * model_view),
        }
    }
}

/// The one place matrix storage order for the GPU is decided.
pub fn gpu_layout(m: Mat4) -> [[f32; 4]; 4] {
    m.to_cols_array_2d()
}

/// Re-derives and uploads the drawn object's transforms on every bind.
///
/// Each drawable owns its own buffer, so the data a draw reads is always the
/// transform passed with that draw.
pub struct TransformCbuf {
    buffer: ConstantBuffer<Transforms>,
}

impl TransformCbuf {
    pub fn new(gfx: &mut Graphics) -> Result<Self> {
        let initial = Transforms::compute(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);
        Ok(Self {
            buffer: ConstantBuffer::vertex(gfx, TRANSFORM_SLOT, &initial)?,
        })
    }
}

impl Bindable for TransformCbuf {
    fn bind(&self, gfx: &mut Graphics, ctx: &DrawContext) {
        let transforms = Transforms::compute(ctx.transform, gfx.camera(), gfx.projection());
        self.buffer.update(gfx, &transforms);
        self.buffer.bind_to(gfx);
    }

    fn kind(&self) -> BindableKind {
        BindableKind::TransformBuffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn layout_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let cols = gpu_layout(m);
        // Translation lives in the fourth column.
        assert_eq!(cols[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(cols[0], [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn model_view_applies_model_first() {
        let model = Mat4::from_translation(Vec3::X);
        let view = Mat4::from_scale(Vec3::splat(2.0));
        let t = Transforms::compute(model, view, Mat4::IDENTITY);
        let mv = Mat4::from_cols_array_2d(&t.model_view);
        assert_eq!(mv * Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(2.0, 0.0, 0.0, 1.0));
        assert_eq!(t.model_view, t.model_view_proj);
    }
}
