use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::bind::{
    ConstantBuffer, ElementType, IndexBuffer, InputLayout, PixelShader, PrimitiveTopology,
    TransformCbuf, VertexBuffer, VertexLayout, VertexShader,
};
use crate::drawable::{Drawable, DrawableBase, DrawableKind};
use crate::error::Result;
use crate::geometry::sphere;
use crate::gfx::{Graphics, Topology};

use super::sync_pixel_constant;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct SolidColor {
    color: [f32; 3],
    _pad: f32,
}

/// Unlit sphere, used to mark the light. The mesh is a shared unit sphere;
/// the radius is applied as a scale when drawing.
pub struct SolidSphere {
    base: DrawableBase,
    radius: f32,
    position: Vec3,
    color: Vec3,
}

impl SolidSphere {
    pub fn new(gfx: &mut Graphics, radius: f32) -> Result<Self> {
        let mut base = DrawableBase::new(gfx, DrawableKind::SolidSphere);

        base.initialize_static(gfx, |gfx, base| {
            let layout = VertexLayout::new().append(ElementType::Position3D);
            let model = sphere::make();
            base.add_static_bind(Rc::new(VertexBuffer::from_data(
                gfx,
                &model.vertex_data(&layout)?,
            )?))?;
            base.add_static_index_buffer(IndexBuffer::new(gfx, &model.indices)?)?;

            let vs = VertexShader::new(gfx, "solid_vs")?;
            let input_layout = InputLayout::new(gfx, &layout, &vs)?;
            base.add_static_bind(Rc::new(vs))?;
            base.add_static_bind(Rc::new(PixelShader::new(gfx, "solid_ps")?))?;
            base.add_static_bind(Rc::new(input_layout))?;
            base.add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))?;
            Ok(())
        })?;

        let color = Vec3::ONE;
        base.add_bind(Rc::new(ConstantBuffer::pixel(gfx, 0, &solid(color))?))?;
        base.add_bind(Rc::new(TransformCbuf::new(gfx)?))?;

        Ok(Self {
            base,
            radius,
            position: Vec3::ZERO,
            color,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Changes the colour and uploads it immediately.
    pub fn set_color(&mut self, gfx: &mut Graphics, color: Vec3) -> Result<()> {
        self.color = color;
        sync_pixel_constant(&self.base, gfx, &solid(color))
    }
}

fn solid(color: Vec3) -> SolidColor {
    SolidColor {
        color: color.to_array(),
        _pad: 0.0,
    }
}

impl Drawable for SolidSphere {
    fn base(&self) -> &DrawableBase {
        &self.base
    }

    fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::ResourceKind;

    #[test]
    fn spheres_of_any_radius_share_one_mesh() {
        let (mut gfx, probe) = Graphics::headless();
        let small = SolidSphere::new(&mut gfx, 0.5).unwrap();
        let large = SolidSphere::new(&mut gfx, 3.0).unwrap();
        assert_eq!(probe.created(ResourceKind::VertexBuffer), 1);

        let origin_to_surface = |s: &SolidSphere| s.transform().transform_point3(Vec3::Z).length();
        assert!((origin_to_surface(&small) - 0.5).abs() < 1e-6);
        assert!((origin_to_surface(&large) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn position_moves_the_center() {
        let (mut gfx, _probe) = Graphics::headless();
        let mut sphere = SolidSphere::new(&mut gfx, 1.0).unwrap();
        sphere.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.transform().transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn set_color_uploads_right_away() {
        let (mut gfx, probe) = Graphics::headless();
        let mut sphere = SolidSphere::new(&mut gfx, 1.0).unwrap();
        let writes = probe.constant_writes();
        sphere.set_color(&mut gfx, Vec3::new(1.0, 0.5, 0.0)).unwrap();
        assert_eq!(sphere.color(), Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(probe.constant_writes(), writes + 1);
    }
}
