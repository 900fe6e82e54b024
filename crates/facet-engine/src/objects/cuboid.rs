use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::bind::{
    ConstantBuffer, ElementType, IndexBuffer, InputLayout, PixelShader, PrimitiveTopology,
    TransformCbuf, VertexBuffer, VertexLayout, VertexShader,
};
use crate::drawable::{Drawable, DrawableBase, DrawableKind};
use crate::error::Result;
use crate::geometry::cube;
use crate::gfx::{Graphics, Topology};
use crate::math::{SeededRandom, Uniform};

use super::{sync_pixel_constant, ColorMaterial, Motion, MotionRanges, MATERIAL_SLOT};

/// Flat-shaded box stretched along its local Z axis.
pub struct Cuboid {
    base: DrawableBase,
    motion: Motion,
    stretch: f32,
    material: ColorMaterial,
}

impl Cuboid {
    pub fn new(
        gfx: &mut Graphics,
        rng: &mut SeededRandom,
        ranges: &MotionRanges,
        stretch: Uniform,
        color: Vec3,
    ) -> Result<Self> {
        let motion = Motion::random(rng, ranges);
        let mut base = DrawableBase::new(gfx, DrawableKind::Cuboid);

        base.initialize_static(gfx, |gfx, base| {
            let layout = VertexLayout::new()
                .append(ElementType::Position3D)
                .append(ElementType::Normal);
            let mut model = cube::make_independent();
            model.set_normals_independent_flat();

            base.add_static_bind(Rc::new(VertexBuffer::from_data(
                gfx,
                &model.vertex_data(&layout)?,
            )?))?;
            base.add_static_index_buffer(IndexBuffer::new(gfx, &model.indices)?)?;

            let vs = VertexShader::new(gfx, "phong_vs")?;
            let input_layout = InputLayout::new(gfx, &layout, &vs)?;
            base.add_static_bind(Rc::new(vs))?;
            base.add_static_bind(Rc::new(PixelShader::new(gfx, "phong_ps")?))?;
            base.add_static_bind(Rc::new(input_layout))?;
            base.add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))?;
            Ok(())
        })?;

        let material = ColorMaterial::new(color.to_array());
        base.add_bind(Rc::new(TransformCbuf::new(gfx)?))?;
        base.add_bind(Rc::new(ConstantBuffer::pixel(gfx, MATERIAL_SLOT, &material)?))?;

        Ok(Self {
            base,
            motion,
            stretch: stretch.sample(rng),
            material,
        })
    }

    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }

    pub fn material(&self) -> &ColorMaterial {
        &self.material
    }

    /// Edits stay CPU-side until [`sync_material`](Self::sync_material).
    pub fn material_mut(&mut self) -> &mut ColorMaterial {
        &mut self.material
    }

    pub fn sync_material(&self, gfx: &mut Graphics) -> Result<()> {
        sync_pixel_constant(&self.base, gfx, &self.material)
    }
}

impl Drawable for Cuboid {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn transform(&self) -> Mat4 {
        self.motion.transform() * Mat4::from_scale(Vec3::new(1.0, 1.0, self.stretch))
    }

    fn update(&mut self, dt: f32) {
        self.motion.update(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::ResourceKind;

    fn spawn(gfx: &mut Graphics, rng: &mut SeededRandom) -> Cuboid {
        Cuboid::new(
            gfx,
            rng,
            &MotionRanges::default(),
            Uniform::new(0.4, 3.0),
            Vec3::new(1.0, 0.5, 0.2),
        )
        .unwrap()
    }

    #[test]
    fn geometry_and_shaders_are_shared() {
        let (mut gfx, probe) = Graphics::headless();
        let mut rng = SeededRandom::new(1);
        let a = spawn(&mut gfx, &mut rng);
        let b = spawn(&mut gfx, &mut rng);

        assert_eq!(probe.created(ResourceKind::VertexBuffer), 1);
        assert_eq!(probe.created(ResourceKind::IndexBuffer), 1);
        assert_eq!(probe.created(ResourceKind::VertexShader), 1);
        // transform + material per instance
        assert_eq!(probe.created(ResourceKind::ConstantBuffer), 4);
        assert_eq!(a.base().index_count(), Some(36));
        assert_eq!(b.base().index_count(), Some(36));
    }

    #[test]
    fn sync_material_reaches_the_buffer() {
        let (mut gfx, probe) = Graphics::headless();
        let mut rng = SeededRandom::new(1);
        let mut cuboid = spawn(&mut gfx, &mut rng);

        cuboid.material_mut().color = [0.0, 0.0, 1.0];
        cuboid.material_mut().specular_power = 8.0;
        cuboid.sync_material(&mut gfx).unwrap();

        gfx.begin_frame();
        cuboid.draw(&mut gfx).unwrap();
        let draws = probe.draws();
        let material = draws[0].pixel_floats(MATERIAL_SLOT).unwrap();
        assert_eq!(&material[..3], &[0.0, 0.0, 1.0]);
        assert_eq!(material[4], 8.0);
    }
}
