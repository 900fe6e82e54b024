use std::path::Path;
use std::rc::Rc;

use glam::Mat4;

use crate::bind::{
    load_image, ConstantBuffer, ElementType, IndexBuffer, InputLayout, PixelShader,
    PrimitiveTopology, Sampler, Texture, TransformCbuf, VertexBuffer, VertexLayout, VertexShader,
};
use crate::drawable::{Drawable, DrawableBase, DrawableKind};
use crate::error::Result;
use crate::geometry::cube;
use crate::gfx::{Graphics, ImageData, SamplerDesc, Topology};
use crate::math::SeededRandom;

use super::{Motion, MotionRanges, SpecularMaterial, MATERIAL_SLOT};

/// Textured box. Everything but the transform is shared, including the
/// texture: the first instance's image skins every box.
pub struct SkinnedBox {
    base: DrawableBase,
    motion: Motion,
}

impl SkinnedBox {
    /// Loads `texture` only if no box has been created yet.
    pub fn new(
        gfx: &mut Graphics,
        rng: &mut SeededRandom,
        ranges: &MotionRanges,
        texture: &Path,
    ) -> Result<Self> {
        Self::build(gfx, rng, ranges, || load_image(texture))
    }

    pub fn from_image(
        gfx: &mut Graphics,
        rng: &mut SeededRandom,
        ranges: &MotionRanges,
        image: &ImageData,
    ) -> Result<Self> {
        Self::build(gfx, rng, ranges, || Ok(image.clone()))
    }

    fn build<F>(gfx: &mut Graphics, rng: &mut SeededRandom, ranges: &MotionRanges, image: F) -> Result<Self>
    where
        F: FnOnce() -> Result<ImageData>,
    {
        let motion = Motion::random(rng, ranges);
        let mut base = DrawableBase::new(gfx, DrawableKind::SkinnedBox);

        base.initialize_static(gfx, |gfx, base| {
            let layout = VertexLayout::new()
                .append(ElementType::Position3D)
                .append(ElementType::Normal)
                .append(ElementType::Texture2D);
            let mut model = cube::make_independent_textured();
            model.set_normals_independent_flat();

            base.add_static_bind(Rc::new(VertexBuffer::from_data(
                gfx,
                &model.vertex_data(&layout)?,
            )?))?;
            base.add_static_index_buffer(IndexBuffer::new(gfx, &model.indices)?)?;

            base.add_static_bind(Rc::new(Texture::new(gfx, &image()?, 0)?))?;
            base.add_static_bind(Rc::new(Sampler::new(gfx, SamplerDesc::default(), 0)?))?;

            let vs = VertexShader::new(gfx, "textured_phong_vs")?;
            let input_layout = InputLayout::new(gfx, &layout, &vs)?;
            base.add_static_bind(Rc::new(vs))?;
            base.add_static_bind(Rc::new(PixelShader::new(gfx, "textured_phong_ps")?))?;
            base.add_static_bind(Rc::new(input_layout))?;
            base.add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))?;
            base.add_static_bind(Rc::new(ConstantBuffer::pixel(
                gfx,
                MATERIAL_SLOT,
                &SpecularMaterial::default(),
            )?))?;
            Ok(())
        })?;

        base.add_bind(Rc::new(TransformCbuf::new(gfx)?))?;
        Ok(Self { base, motion })
    }

    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }
}

impl Drawable for SkinnedBox {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn transform(&self) -> Mat4 {
        self.motion.transform()
    }

    fn update(&mut self, dt: f32) {
        self.motion.update(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::ResourceKind;
    use std::path::PathBuf;

    fn checker() -> ImageData {
        ImageData {
            width: 2,
            height: 2,
            rgba: vec![255; 16],
        }
    }

    #[test]
    fn texture_is_loaded_once() {
        let (mut gfx, probe) = Graphics::headless();
        let mut rng = SeededRandom::new(2);
        let ranges = MotionRanges::default();
        SkinnedBox::from_image(&mut gfx, &mut rng, &ranges, &checker()).unwrap();
        // A later box never touches its path.
        SkinnedBox::new(&mut gfx, &mut rng, &ranges, &PathBuf::from("/missing.png")).unwrap();

        assert_eq!(probe.created(ResourceKind::Texture), 1);
        assert_eq!(probe.created(ResourceKind::Sampler), 1);
    }

    #[test]
    fn draw_binds_texture_slot_zero() {
        let (mut gfx, probe) = Graphics::headless();
        let mut rng = SeededRandom::new(2);
        let skinned =
            SkinnedBox::from_image(&mut gfx, &mut rng, &MotionRanges::default(), &checker()).unwrap();
        gfx.begin_frame();
        skinned.draw(&mut gfx).unwrap();
        let draw = &probe.draws()[0];
        assert!(draw.textures.contains_key(&0));
        assert!(draw.samplers.contains_key(&0));
        assert_eq!(draw.index_count, 36);
    }

    #[test]
    fn unreadable_first_texture_leaves_kind_uninitialized() {
        let (mut gfx, _probe) = Graphics::headless();
        let mut rng = SeededRandom::new(2);
        let ranges = MotionRanges::default();
        assert!(SkinnedBox::new(&mut gfx, &mut rng, &ranges, &PathBuf::from("/missing.png")).is_err());
        assert!(!gfx.statics().is_initialized(DrawableKind::SkinnedBox));
        SkinnedBox::from_image(&mut gfx, &mut rng, &ranges, &checker()).unwrap();
    }
}
