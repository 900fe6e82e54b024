use crate::error::Result;
use crate::gfx::{BufferId, Graphics};

use super::{Bindable, BindableKind, DrawContext};

/// 16-bit index buffer. Its `count` is what the owning drawable draws.
pub struct IndexBuffer {
    id: BufferId,
    count: u32,
}

impl IndexBuffer {
    pub fn new(gfx: &mut Graphics, indices: &[u16]) -> Result<Self> {
        let id = gfx.backend_mut().create_index_buffer(indices)?;
        log::trace!("index buffer {id:?} with {} indices", indices.len());
        Ok(Self {
            id,
            count: indices.len() as u32,
        })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn id(&self) -> BufferId {
        self.id
    }
}

impl Bindable for IndexBuffer {
    fn bind(&self, gfx: &mut Graphics, _ctx: &DrawContext) {
        gfx.backend_mut().set_index_buffer(self.id);
    }

    fn kind(&self) -> BindableKind {
        BindableKind::IndexBuffer
    }

    fn as_index_buffer(&self) -> Option<&IndexBuffer> {
        Some(self)
    }
}
