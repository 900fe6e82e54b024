use std::path::PathBuf;

use glam::Mat4;

use crate::drawable::StaticBindRegistry;
use crate::error::GraphicsError;

use super::backend::{Backend, FrameStatus, ShaderSource, ShaderStage};
use super::headless::{HeadlessBackend, HeadlessProbe};
use super::shaders::ShaderLibrary;

/// Configuration of the rendering context.
#[derive(Debug, Clone)]
pub struct GraphicsConfig {
    /// Directory holding `<name>.wgsl` files. `None` is only valid headless.
    pub shader_dir: Option<PathBuf>,

    pub clear_color: [f32; 4],

    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            shader_dir: None,
            clear_color: [0.07, 0.0, 0.12, 1.0],
            // 1 x 0.75 view plane at the near distance of 0.5.
            fov_y: 2.0 * 0.75f32.atan(),
            near: 0.5,
            far: 40.0,
        }
    }
}

/// Rendering context handed to every bindable and drawable.
///
/// Owns the backend, the camera and projection matrices, the shader library
/// and the per-kind static bind caches.
pub struct Graphics {
    backend: Box<dyn Backend>,
    shaders: ShaderLibrary,
    statics: StaticBindRegistry,
    config: GraphicsConfig,
    camera: Mat4,
    projection: Mat4,
}

impl Graphics {
    pub fn new(backend: Box<dyn Backend>, config: GraphicsConfig) -> Self {
        let (width, height) = backend.size();
        let projection = projection_for(&config, width, height);
        Self {
            backend,
            shaders: ShaderLibrary::new(config.shader_dir.clone()),
            statics: StaticBindRegistry::default(),
            config,
            camera: Mat4::IDENTITY,
            projection,
        }
    }

    /// Context over a [`HeadlessBackend`], for tests and tools.
    pub fn headless() -> (Self, HeadlessProbe) {
        let (backend, probe) = HeadlessBackend::new(800, 600);
        (Self::new(Box::new(backend), GraphicsConfig::default()), probe)
    }

    pub fn backend_mut(&mut self) -> &mut dyn Backend {
        self.backend.as_mut()
    }

    /// Per-kind static bind caches of this device.
    pub fn statics(&self) -> &StaticBindRegistry {
        &self.statics
    }

    pub(crate) fn statics_mut(&mut self) -> &mut StaticBindRegistry {
        &mut self.statics
    }

    pub fn load_shader(&mut self, name: &str, stage: ShaderStage) -> Result<ShaderSource, GraphicsError> {
        self.shaders.load(name, stage)
    }

    /// World-to-view matrix of the active camera.
    pub fn camera(&self) -> Mat4 {
        self.camera
    }

    pub fn set_camera(&mut self, camera: Mat4) {
        self.camera = camera;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.config.clear_color = color;
    }

    pub fn size(&self) -> (u32, u32) {
        self.backend.size()
    }

    /// Resizes the backbuffer and refits the projection to the new aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.backend.resize(width, height);
        self.projection = projection_for(&self.config, width, height);
    }

    pub fn begin_frame(&mut self) {
        self.backend.begin_frame(self.config.clear_color);
    }

    pub fn end_frame(&mut self) -> Result<FrameStatus, GraphicsError> {
        self.backend.end_frame()
    }

    pub fn draw_indexed(&mut self, count: u32) -> Result<(), GraphicsError> {
        self.backend.draw_indexed(count)
    }
}

fn projection_for(config: &GraphicsConfig, width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    Mat4::perspective_lh(config.fov_y, aspect, config.near, config.far)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_refits_projection() {
        let (mut gfx, _probe) = Graphics::headless();
        let before = gfx.projection();
        gfx.resize(1600, 600);
        assert_eq!(gfx.size(), (1600, 600));
        assert_ne!(gfx.projection(), before);
    }

    #[test]
    fn zero_size_resize_is_ignored() {
        let (mut gfx, _probe) = Graphics::headless();
        gfx.resize(0, 300);
        assert_eq!(gfx.size(), (800, 600));
    }

    #[test]
    fn clear_color_is_kept_for_later_frames() {
        let (mut gfx, _probe) = Graphics::headless();
        gfx.set_clear_color([0.1, 0.2, 0.3, 1.0]);
        assert_eq!(gfx.config.clear_color, [0.1, 0.2, 0.3, 1.0]);
    }
}
