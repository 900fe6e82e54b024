use std::collections::BTreeMap;

use crate::error::GraphicsError;

use super::backend::{BufferId, LayoutId, SamplerId, ShaderId, TextureId, Topology};

/// Pipeline state recorded by `Backend::set_*`.
///
/// Bindings persist across draws, the way an immediate-mode context keeps
/// whatever was last bound. `begin_frame` resets everything.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub vertex_buffer: Option<(BufferId, u32)>,
    pub index_buffer: Option<BufferId>,
    pub vertex_shader: Option<ShaderId>,
    pub pixel_shader: Option<ShaderId>,
    pub input_layout: Option<LayoutId>,
    pub topology: Topology,
    pub vertex_constants: BTreeMap<u32, BufferId>,
    pub pixel_constants: BTreeMap<u32, BufferId>,
    pub textures: BTreeMap<u32, TextureId>,
    pub samplers: BTreeMap<u32, SamplerId>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            vertex_buffer: None,
            index_buffer: None,
            vertex_shader: None,
            pixel_shader: None,
            input_layout: None,
            topology: Topology::TriangleList,
            vertex_constants: BTreeMap::new(),
            pixel_constants: BTreeMap::new(),
            textures: BTreeMap::new(),
            samplers: BTreeMap::new(),
        }
    }
}

/// The mandatory part of the state, resolved for one draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawTargets {
    pub vertex_buffer: BufferId,
    pub stride: u32,
    pub index_buffer: BufferId,
    pub vertex_shader: ShaderId,
    pub pixel_shader: ShaderId,
    pub input_layout: LayoutId,
}

impl PipelineState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Checks that every stage a draw needs is bound.
    ///
    /// `layout_shader` reports which vertex shader a layout was created for.
    pub fn resolve(
        &self,
        layout_shader: impl FnOnce(LayoutId) -> Option<ShaderId>,
    ) -> Result<DrawTargets, GraphicsError> {
        let (vertex_buffer, stride) = self
            .vertex_buffer
            .ok_or(GraphicsError::IncompleteState("vertex buffer"))?;
        let index_buffer = self
            .index_buffer
            .ok_or(GraphicsError::IncompleteState("index buffer"))?;
        let input_layout = self
            .input_layout
            .ok_or(GraphicsError::IncompleteState("input layout"))?;
        let pixel_shader = self
            .pixel_shader
            .ok_or(GraphicsError::IncompleteState("pixel shader"))?;

        let expected = layout_shader(input_layout).ok_or(GraphicsError::UnknownHandle {
            kind: "input layout",
            id: input_layout.raw(),
        })?;
        let vertex_shader = match self.vertex_shader {
            Some(vs) if vs == expected => vs,
            bound => {
                return Err(GraphicsError::LayoutMismatch { expected, bound });
            }
        };

        Ok(DrawTargets {
            vertex_buffer,
            stride,
            index_buffer,
            vertex_shader,
            pixel_shader,
            input_layout,
        })
    }
}
