//! Procedural scene objects built on [`DrawableBase`].
//!
//! Each type keeps its shaders, input layout and topology in the static list
//! of its kind. Geometry is static when every instance shares it and
//! per-instance when tessellation is randomized.

mod asset_mesh;
mod cuboid;
mod cylinder;
mod motion;
mod pyramid;
mod skinned_box;
mod solid_sphere;

use bytemuck::Pod;

use crate::bind::BindableKind;
use crate::drawable::DrawableBase;
use crate::error::{BindError, Result};
use crate::gfx::Graphics;

pub use asset_mesh::AssetMesh;
pub use cuboid::Cuboid;
pub use cylinder::Cylinder;
pub use motion::{Motion, MotionRanges};
pub use pyramid::Pyramid;
pub use skinned_box::SkinnedBox;
pub use solid_sphere::SolidSphere;

/// Pixel slot materials are bound to; slot 0 holds the light.
pub const MATERIAL_SLOT: u32 = 1;

/// Flat colour plus specular terms, for `phong_ps`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorMaterial {
    pub color: [f32; 3],
    pub specular_intensity: f32,
    pub specular_power: f32,
    pub _pad: [f32; 3],
}

impl ColorMaterial {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            specular_intensity: 0.6,
            specular_power: 30.0,
            _pad: [0.0; 3],
        }
    }
}

/// Specular terms only; the colour comes from vertices or textures.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpecularMaterial {
    pub specular_intensity: f32,
    pub specular_power: f32,
    pub _pad: [f32; 2],
}

impl SpecularMaterial {
    pub fn new(specular_intensity: f32, specular_power: f32) -> Self {
        Self {
            specular_intensity,
            specular_power,
            _pad: [0.0; 2],
        }
    }
}

impl Default for SpecularMaterial {
    fn default() -> Self {
        Self::new(0.6, 30.0)
    }
}

/// Rewrites the first per-instance pixel constant buffer of `base` with
/// `data`, locating it through [`DrawableBase::query_bindable`].
pub fn sync_pixel_constant<C: Pod>(base: &DrawableBase, gfx: &mut Graphics, data: &C) -> Result<()> {
    let kind = BindableKind::PixelConstantBuffer;
    let upload = base
        .query_bindable(kind)
        .and_then(|bind| bind.as_constant_upload())
        .ok_or(BindError::BindableNotFound {
            drawable: base.kind(),
            kind,
        })?;
    upload.upload_bytes(gfx, bytemuck::bytes_of(data))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_sizes_are_uniform_aligned() {
        assert_eq!(std::mem::size_of::<ColorMaterial>(), 32);
        assert_eq!(std::mem::size_of::<SpecularMaterial>(), 16);
    }
}
