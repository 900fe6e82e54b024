use crate::error::Result;
use crate::gfx::{Graphics, ShaderId, ShaderSource, ShaderStage};

use super::{Bindable, BindableKind, DrawContext};

/// Vertex stage program. Keeps its source so input layouts can be created
/// against it.
pub struct VertexShader {
    id: ShaderId,
    bytecode: ShaderSource,
}

impl VertexShader {
    /// Loads `<shader_dir>/<name>.wgsl` and compiles it.
    pub fn new(gfx: &mut Graphics, name: &str) -> Result<Self> {
        let bytecode = gfx.load_shader(name, ShaderStage::Vertex)?;
        let id = gfx.backend_mut().create_shader(&bytecode)?;
        Ok(Self { id, bytecode })
    }

    pub fn bytecode(&self) -> &ShaderSource {
        &self.bytecode
    }

    pub fn id(&self) -> ShaderId {
        self.id
    }
}

impl Bindable for VertexShader {
    fn bind(&self, gfx: &mut Graphics, _ctx: &DrawContext) {
        gfx.backend_mut().set_shader(ShaderStage::Vertex, self.id);
    }

    fn kind(&self) -> BindableKind {
        BindableKind::VertexShader
    }
}

pub struct PixelShader {
    id: ShaderId,
    name: String,
}

impl PixelShader {
    pub fn new(gfx: &mut Graphics, name: &str) -> Result<Self> {
        let source = gfx.load_shader(name, ShaderStage::Pixel)?;
        let id = gfx.backend_mut().create_shader(&source)?;
        Ok(Self {
            id,
            name: name.to_string(),
        })
    }

    pub fn id(&self) -> ShaderId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Bindable for PixelShader {
    fn bind(&self, gfx: &mut Graphics, _ctx: &DrawContext) {
        gfx.backend_mut().set_shader(ShaderStage::Pixel, self.id);
    }

    fn kind(&self) -> BindableKind {
        BindableKind::PixelShader
    }
}
