use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::bind::{
    ConstantBuffer, ElementType, IndexBuffer, InputLayout, PixelShader, PrimitiveTopology,
    TransformCbuf, VertexBuffer, VertexLayout, VertexShader,
};
use crate::drawable::{Drawable, DrawableBase, DrawableKind};
use crate::error::Result;
use crate::geometry::cone;
use crate::gfx::{Graphics, Topology};
use crate::math::{SeededRandom, UniformInt};

use super::{Motion, MotionRanges, SpecularMaterial, MATERIAL_SLOT};

const BODY_COLOR: [u8; 4] = [10, 10, 255, 255];
const TIP_COLOR: [u8; 4] = [255, 10, 10, 255];

fn layout() -> VertexLayout {
    VertexLayout::new()
        .append(ElementType::Position3D)
        .append(ElementType::Normal)
        .append(ElementType::Rgba8Color)
}

/// Squashed cone with per-vertex colours blended across each face.
pub struct Pyramid {
    base: DrawableBase,
    motion: Motion,
}

impl Pyramid {
    pub fn new(
        gfx: &mut Graphics,
        rng: &mut SeededRandom,
        ranges: &MotionRanges,
        segments: UniformInt,
    ) -> Result<Self> {
        let motion = Motion::random(rng, ranges);
        let mut base = DrawableBase::new(gfx, DrawableKind::Pyramid);

        base.initialize_static(gfx, |gfx, base| {
            let vs = VertexShader::new(gfx, "blended_phong_vs")?;
            let input_layout = InputLayout::new(gfx, &layout(), &vs)?;
            base.add_static_bind(Rc::new(vs))?;
            base.add_static_bind(Rc::new(PixelShader::new(gfx, "blended_phong_ps")?))?;
            base.add_static_bind(Rc::new(input_layout))?;
            base.add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))?;
            base.add_static_bind(Rc::new(ConstantBuffer::pixel(
                gfx,
                MATERIAL_SLOT,
                &SpecularMaterial::default(),
            )?))?;
            Ok(())
        })?;

        let segments = segments.sample(rng).clamp(3, cone::MAX_DIV as u32) as u16;
        let mut model = cone::make_tesselated_independent_faces(segments);
        model.colors = vec![BODY_COLOR; model.vertex_count()];
        for side in 0..segments as usize {
            model.colors[side * 3] = TIP_COLOR;
        }
        model.transform(Mat4::from_scale(Vec3::new(1.0, 1.0, 0.7)));
        model.set_normals_independent_flat();

        base.add_bind(Rc::new(VertexBuffer::from_data(gfx, &model.vertex_data(&layout())?)?))?;
        base.add_index_buffer(IndexBuffer::new(gfx, &model.indices)?)?;
        base.add_bind(Rc::new(TransformCbuf::new(gfx)?))?;

        Ok(Self { base, motion })
    }

    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }
}

impl Drawable for Pyramid {
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

    #[test]
    fn material_is_shared_and_geometry_is_not() {
        let (mut gfx, probe) = Graphics::headless();
        let mut rng = SeededRandom::new(4);
        let ranges = MotionRanges::default();
        for _ in 0..3 {
            Pyramid::new(&mut gfx, &mut rng, &ranges, UniformInt::new(3, 8)).unwrap();
        }
        assert_eq!(probe.created(ResourceKind::VertexBuffer), 3);
        assert_eq!(probe.created(ResourceKind::PixelShader), 1);
        // one shared material, three transform buffers
        assert_eq!(probe.created(ResourceKind::ConstantBuffer), 4);
    }

    #[test]
    fn oversized_tessellation_is_capped() {
        let (mut gfx, _probe) = Graphics::headless();
        let mut rng = SeededRandom::new(6);
        let pyramid =
            Pyramid::new(&mut gfx, &mut rng, &MotionRanges::default(), UniformInt::new(20000, 20000)).unwrap();
        assert_eq!(pyramid.base().index_count(), Some(cone::MAX_DIV as u32 * 6));
    }
}
