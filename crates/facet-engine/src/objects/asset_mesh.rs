use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::bind::{
    ConstantBuffer, ElementType, IndexBuffer, InputLayout, PixelShader, PrimitiveTopology,
    TransformCbuf, VertexBuffer, VertexLayout, VertexShader,
};
use crate::drawable::{Drawable, DrawableBase, DrawableKind};
use crate::error::Result;
use crate::gfx::{Graphics, Topology};
use crate::math::SeededRandom;
use crate::scene::ImportedMesh;

use super::{sync_pixel_constant, ColorMaterial, Motion, MotionRanges, MATERIAL_SLOT};

fn layout() -> VertexLayout {
    VertexLayout::new()
        .append(ElementType::Position3D)
        .append(ElementType::Normal)
}

/// One imported mesh flying around as a test object, shaded with a flat
/// material colour.
pub struct AssetMesh {
    base: DrawableBase,
    motion: Motion,
    scale: f32,
    material: ColorMaterial,
}

impl AssetMesh {
    pub fn new(
        gfx: &mut Graphics,
        rng: &mut SeededRandom,
        ranges: &MotionRanges,
        mesh: &ImportedMesh,
        color: Vec3,
        scale: f32,
    ) -> Result<Self> {
        let motion = Motion::random(rng, ranges);
        let mut base = DrawableBase::new(gfx, DrawableKind::AssetMesh);

        base.initialize_static(gfx, |gfx, base| {
            let vs = VertexShader::new(gfx, "phong_vs")?;
            let input_layout = InputLayout::new(gfx, &layout(), &vs)?;
            base.add_static_bind(Rc::new(vs))?;
            base.add_static_bind(Rc::new(PixelShader::new(gfx, "phong_ps")?))?;
            base.add_static_bind(Rc::new(input_layout))?;
            base.add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))?;
            Ok(())
        })?;

        let vertices = mesh.geometry.vertex_data(&layout())?;
        base.add_bind(Rc::new(VertexBuffer::from_data(gfx, &vertices)?))?;
        base.add_index_buffer(IndexBuffer::new(gfx, &mesh.geometry.indices)?)?;

        let material = ColorMaterial::new(color.to_array());
        base.add_bind(Rc::new(ConstantBuffer::pixel(gfx, MATERIAL_SLOT, &material)?))?;
        base.add_bind(Rc::new(TransformCbuf::new(gfx)?))?;
        log::debug!("asset mesh `{}` ({} vertices)", mesh.name, vertices.len());

        Ok(Self {
            base,
            motion,
            scale,
            material,
        })
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

impl Drawable for AssetMesh {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn transform(&self) -> Mat4 {
        self.motion.transform() * Mat4::from_scale(Vec3::splat(self.scale))
    }

    fn update(&mut self, dt: f32) {
        self.motion.update(dt);
    }
}
