use crate::error::Result;
use crate::gfx::{Graphics, LayoutId};

use super::{Bindable, BindableKind, DrawContext, VertexLayout, VertexShader};

/// Vertex attribute description, validated against one vertex shader.
pub struct InputLayout {
    id: LayoutId,
}

impl InputLayout {
    pub fn new(gfx: &mut Graphics, layout: &VertexLayout, vertex_shader: &VertexShader) -> Result<Self> {
        let id = gfx.backend_mut().create_input_layout(
            &layout.input_elements(),
            layout.size(),
            vertex_shader.id(),
        )?;
        log::trace!(
            "input layout {id:?} for `{}` ({} elements)",
            vertex_shader.bytecode().name,
            layout.elements().len()
        );
        Ok(Self { id })
    }

    pub fn id(&self) -> LayoutId {
        self.id
    }
}

impl Bindable for InputLayout {
    fn bind(&self, gfx: &mut Graphics, _ctx: &DrawContext) {
        gfx.backend_mut().set_input_layout(self.id);
    }

    fn kind(&self) -> BindableKind {
        BindableKind::InputLayout
    }
}
