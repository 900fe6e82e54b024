use glam::{Mat4, Vec3};

use crate::bind::ConstantBuffer;
use crate::drawable::Drawable;
use crate::error::Result;
use crate::gfx::Graphics;
use crate::objects::SolidSphere;

/// Pixel slot the light constants are bound to.
pub const LIGHT_SLOT: u32 = 0;

/// Point light parameters as the phong shaders read them.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightParams {
    pub position: [f32; 3],
    _pad0: f32,
    pub ambient: [f32; 3],
    _pad1: f32,
    pub diffuse_color: [f32; 3],
    pub diffuse_intensity: f32,
    pub att_const: f32,
    pub att_lin: f32,
    pub att_quad: f32,
    _pad2: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            position: [1.5, 14.0, -4.5],
            _pad0: 0.0,
            ambient: [0.05; 3],
            _pad1: 0.0,
            diffuse_color: [1.0; 3],
            diffuse_intensity: 1.0,
            att_const: 1.0,
            att_lin: 0.045,
            att_quad: 0.0075,
            _pad2: 0.0,
        }
    }
}

impl LightParams {
    /// Attenuation at `distance` from the light.
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.att_const + self.att_lin * distance + self.att_quad * distance * distance)
    }
}

/// A single point light plus the sphere marking where it is.
pub struct PointLight {
    params: LightParams,
    cbuf: ConstantBuffer<LightParams>,
    marker: SolidSphere,
}

impl PointLight {
    pub const MARKER_RADIUS: f32 = 0.5;

    pub fn new(gfx: &mut Graphics) -> Result<Self> {
        Self::with_radius(gfx, Self::MARKER_RADIUS)
    }

    pub fn with_radius(gfx: &mut Graphics, radius: f32) -> Result<Self> {
        let params = LightParams::default();
        let cbuf = ConstantBuffer::pixel(gfx, LIGHT_SLOT, &params)?;
        let marker = SolidSphere::new(gfx, radius)?;
        Ok(Self {
            params,
            cbuf,
            marker,
        })
    }

    pub fn params(&self) -> &LightParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut LightParams {
        &mut self.params
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from(self.params.position)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.params.position = position.to_array();
    }

    pub fn reset(&mut self) {
        self.params = LightParams::default();
    }

    /// Uploads the parameters with the position moved into view space and
    /// binds them for every drawable that follows.
    pub fn bind(&self, gfx: &mut Graphics, view: Mat4) {
        let mut data = self.params;
        data.position = view.transform_point3(self.position()).to_array();
        self.cbuf.update(gfx, &data);
        self.cbuf.bind_to(gfx);
    }

    /// Draws the marker. The marker rebinds pixel slot 0, so draw it after
    /// everything lit by this light.
    pub fn draw(&mut self, gfx: &mut Graphics) -> Result<()> {
        self.marker.set_position(self.position());
        self.marker.draw(gfx)
    }
}
