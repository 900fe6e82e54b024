use std::rc::Rc;

use crate::error::GraphicsError;

use super::state::PipelineState;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Raw numeric value, stable for the lifetime of the backend.
            pub fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

handle!(
    /// Vertex, index or constant buffer owned by a backend.
    BufferId
);
handle!(
    /// Compiled shader module.
    ShaderId
);
handle!(
    /// Input layout description tied to a vertex shader.
    LayoutId
);
handle!(TextureId);
handle!(SamplerId);

/// Programmable stage a shader or constant buffer belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

/// Per-attribute formats understood by the backends.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
    Unorm8x4,
}

impl VertexFormat {
    pub fn size(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
            VertexFormat::Unorm8x4 => 4,
        }
    }
}

/// One attribute of an input layout. `location` matches `@location(n)` in WGSL.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct VertexElement {
    pub semantic: &'static str,
    pub format: VertexFormat,
    pub offset: u32,
    pub location: u32,
}

/// Shader code handed to the backend. WGSL is our "bytecode".
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub name: String,
    pub stage: ShaderStage,
    pub code: Rc<str>,
}

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Single opaque white texel.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum AddressMode {
    #[default]
    Wrap,
    Clamp,
    Mirror,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SamplerDesc {
    pub filter: Filter,
    pub address: AddressMode,
}

/// Result of presenting a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    Presented,
    /// The surface could not provide a frame; nothing was shown.
    Skipped,
}

/// Device abstraction the bindables talk to.
///
/// Creation calls allocate and may fail. `set_*` calls only record pipeline
/// state and never fail; the state is validated when a draw is issued.
pub trait Backend {
    fn create_vertex_buffer(&mut self, data: &[u8], stride: u32) -> Result<BufferId, GraphicsError>;
    fn create_index_buffer(&mut self, indices: &[u16]) -> Result<BufferId, GraphicsError>;
    fn create_constant_buffer(&mut self, initial: &[u8]) -> Result<BufferId, GraphicsError>;

    /// Replaces the whole contents of a constant buffer (write-discard).
    fn update_constant_buffer(&mut self, id: BufferId, data: &[u8]);

    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, GraphicsError>;
    fn create_input_layout(
        &mut self,
        elements: &[VertexElement],
        stride: u32,
        vertex_shader: ShaderId,
    ) -> Result<LayoutId, GraphicsError>;
    fn create_texture(&mut self, image: &ImageData) -> Result<TextureId, GraphicsError>;
    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerId, GraphicsError>;

    fn state_mut(&mut self) -> &mut PipelineState;

    fn set_vertex_buffer(&mut self, id: BufferId, stride: u32) {
        self.state_mut().vertex_buffer = Some((id, stride));
    }

    fn set_index_buffer(&mut self, id: BufferId) {
        self.state_mut().index_buffer = Some(id);
    }

    fn set_shader(&mut self, stage: ShaderStage, id: ShaderId) {
        let state = self.state_mut();
        match stage {
            ShaderStage::Vertex => state.vertex_shader = Some(id),
            ShaderStage::Pixel => state.pixel_shader = Some(id),
        }
    }

    fn set_input_layout(&mut self, id: LayoutId) {
        self.state_mut().input_layout = Some(id);
    }

    fn set_constant_buffer(&mut self, stage: ShaderStage, slot: u32, id: BufferId) {
        let state = self.state_mut();
        match stage {
            ShaderStage::Vertex => state.vertex_constants.insert(slot, id),
            ShaderStage::Pixel => state.pixel_constants.insert(slot, id),
        };
    }

    fn set_topology(&mut self, topology: Topology) {
        self.state_mut().topology = topology;
    }

    fn set_texture(&mut self, slot: u32, id: TextureId) {
        self.state_mut().textures.insert(slot, id);
    }

    fn set_sampler(&mut self, slot: u32, id: SamplerId) {
        self.state_mut().samplers.insert(slot, id);
    }

    /// Issues one indexed draw with the currently bound state.
    fn draw_indexed(&mut self, count: u32) -> Result<(), GraphicsError>;

    fn begin_frame(&mut self, clear: [f32; 4]);
    fn end_frame(&mut self) -> Result<FrameStatus, GraphicsError>;

    fn resize(&mut self, width: u32, height: u32);
    fn size(&self) -> (u32, u32);
}
