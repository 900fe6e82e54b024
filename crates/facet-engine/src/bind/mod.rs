//! Bindables: objects that each configure one piece of pipeline state.
//!
//! A drawable is an ordered list of bindables plus one index buffer. Binding
//! never allocates; every GPU resource is created in the constructor.

mod constant_buffer;
mod index_buffer;
mod input_layout;
mod sampler;
mod shader;
mod texture;
mod topology;
mod transform_cbuf;
mod vertex;
mod vertex_buffer;

use glam::Mat4;

use crate::gfx::Graphics;

pub use constant_buffer::{ConstantBuffer, ConstantUpload};
pub use index_buffer::IndexBuffer;
pub use input_layout::InputLayout;
pub use sampler::Sampler;
pub use shader::{PixelShader, VertexShader};
pub use texture::{load_image, Texture};
pub use topology::PrimitiveTopology;
pub use transform_cbuf::{gpu_layout, TransformCbuf, Transforms, TRANSFORM_SLOT};
pub use vertex::{AttrValue, ElementType, VertexData, VertexLayout};
pub use vertex_buffer::VertexBuffer;

/// Capability tag used for lookups instead of downcasting.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BindableKind {
    VertexBuffer,
    IndexBuffer,
    VertexShader,
    PixelShader,
    InputLayout,
    VertexConstantBuffer,
    PixelConstantBuffer,
    Topology,
    Texture,
    Sampler,
    TransformBuffer,
}

/// Per-draw parameters passed to every bindable.
#[derive(Debug, Copy, Clone)]
pub struct DrawContext {
    /// Model-to-world transform of the object being drawn.
    pub transform: Mat4,
}

impl DrawContext {
    pub fn new(transform: Mat4) -> Self {
        Self { transform }
    }
}

pub trait Bindable {
    /// Pushes this bindable's state into the pipeline.
    fn bind(&self, gfx: &mut Graphics, ctx: &DrawContext);

    fn kind(&self) -> BindableKind;

    fn as_index_buffer(&self) -> Option<&IndexBuffer> {
        None
    }

    /// Type-erased access for constant buffers, used by debug hooks that
    /// locate a buffer through `query_bindable`.
    fn as_constant_upload(&self) -> Option<&dyn ConstantUpload> {
        None
    }
}
