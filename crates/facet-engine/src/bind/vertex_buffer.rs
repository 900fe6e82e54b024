use bytemuck::Pod;

use crate::error::Result;
use crate::gfx::{BufferId, Graphics};

use super::{Bindable, BindableKind, DrawContext, VertexData};

pub struct VertexBuffer {
    id: BufferId,
    stride: u32,
}

impl VertexBuffer {
    /// Uploads typed vertices; the stride is the size of `V`.
    pub fn new<V: Pod>(gfx: &mut Graphics, vertices: &[V]) -> Result<Self> {
        let stride = std::mem::size_of::<V>() as u32;
        let id = gfx
            .backend_mut()
            .create_vertex_buffer(bytemuck::cast_slice(vertices), stride)?;
        Ok(Self { id, stride })
    }

    /// Uploads vertices described by a runtime layout.
    pub fn from_data(gfx: &mut Graphics, data: &VertexData) -> Result<Self> {
        let stride = data.layout().size();
        let id = gfx.backend_mut().create_vertex_buffer(data.bytes(), stride)?;
        Ok(Self { id, stride })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }
}

impl Bindable for VertexBuffer {
    fn bind(&self, gfx: &mut Graphics, _ctx: &DrawContext) {
        gfx.backend_mut().set_vertex_buffer(self.id, self.stride);
    }

    fn kind(&self) -> BindableKind {
        BindableKind::VertexBuffer
    }
}
