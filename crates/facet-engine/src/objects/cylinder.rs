use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::bind::{
    ConstantBuffer, ElementType, IndexBuffer, InputLayout, PixelShader, PrimitiveTopology,
    TransformCbuf, VertexBuffer, VertexLayout, VertexShader,
};
use crate::drawable::{Drawable, DrawableBase, DrawableKind};
use crate::error::Result;
use crate::geometry::prism;
use crate::gfx::{Graphics, Topology};
use crate::math::{SeededRandom, UniformInt};

use super::{sync_pixel_constant, ColorMaterial, Motion, MotionRanges, MATERIAL_SLOT};

fn layout() -> VertexLayout {
    VertexLayout::new()
        .append(ElementType::Position3D)
        .append(ElementType::Normal)
}

/// Prism with a random number of sides. Only the shading setup is shared;
/// every instance owns its tessellation.
pub struct Cylinder {
    base: DrawableBase,
    motion: Motion,
    segments: u16,
    material: ColorMaterial,
}

impl Cylinder {
    pub fn new(
        gfx: &mut Graphics,
        rng: &mut SeededRandom,
        ranges: &MotionRanges,
        segments: UniformInt,
        color: Vec3,
    ) -> Result<Self> {
        let motion = Motion::random(rng, ranges);
        let mut base = DrawableBase::new(gfx, DrawableKind::Cylinder);

        base.initialize_static(gfx, |gfx, base| {
            let vs = VertexShader::new(gfx, "phong_vs")?;
            let input_layout = InputLayout::new(gfx, &layout(), &vs)?;
            base.add_static_bind(Rc::new(vs))?;
            base.add_static_bind(Rc::new(PixelShader::new(gfx, "phong_ps")?))?;
            base.add_static_bind(Rc::new(input_layout))?;
            base.add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))?;
            Ok(())
        })?;

        let segments = segments.sample(rng).clamp(3, prism::MAX_DIV as u32) as u16;
        let model = prism::make_tesselated_independent_cap_normals(segments);
        base.add_bind(Rc::new(VertexBuffer::from_data(gfx, &model.vertex_data(&layout())?)?))?;
        base.add_index_buffer(IndexBuffer::new(gfx, &model.indices)?)?;

        let material = ColorMaterial::new(color.to_array());
        base.add_bind(Rc::new(ConstantBuffer::pixel(gfx, MATERIAL_SLOT, &material)?))?;
        base.add_bind(Rc::new(TransformCbuf::new(gfx)?))?;

        Ok(Self {
            base,
            motion,
            segments,
            material,
        })
    }

    pub fn segments(&self) -> u16 {
        self.segments
    }

    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }

    pub fn material_mut(&mut self) -> &mut ColorMaterial {
        &mut self.material
    }

    pub fn sync_material(&self, gfx: &mut Graphics) -> Result<()> {
        sync_pixel_constant(&self.base, gfx, &self.material)
    }
}

impl Drawable for Cylinder {
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
    fn tessellation_is_per_instance() {
        let (mut gfx, probe) = Graphics::headless();
        let mut rng = SeededRandom::new(9);
        let ranges = MotionRanges::default();
        let a = Cylinder::new(&mut gfx, &mut rng, &ranges, UniformInt::new(3, 3), Vec3::ONE).unwrap();
        let b = Cylinder::new(&mut gfx, &mut rng, &ranges, UniformInt::new(10, 10), Vec3::ONE).unwrap();

        assert_eq!(probe.created(ResourceKind::VertexBuffer), 2);
        assert_eq!(probe.created(ResourceKind::VertexShader), 1);
        assert_eq!(a.base().index_count(), Some(3 * 12));
        assert_eq!(b.base().index_count(), Some(10 * 12));
    }

    #[test]
    fn oversized_tessellation_is_capped() {
        let (mut gfx, _probe) = Graphics::headless();
        let mut rng = SeededRandom::new(2);
        let ranges = MotionRanges::default();
        let cylinder =
            Cylinder::new(&mut gfx, &mut rng, &ranges, UniformInt::new(20000, 20000), Vec3::ONE).unwrap();
        assert_eq!(cylinder.segments(), prism::MAX_DIV);
        assert_eq!(cylinder.base().index_count(), Some(prism::MAX_DIV as u32 * 12));
    }
}
