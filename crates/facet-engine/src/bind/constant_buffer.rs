use std::marker::PhantomData;

use bytemuck::Pod;

use crate::error::{BindError, Result};
use crate::gfx::{BufferId, Graphics, ShaderStage};

use super::{Bindable, BindableKind, DrawContext};

/// Typed uniform buffer attached to one stage slot.
///
/// `update` replaces the whole contents; there are no partial writes.
pub struct ConstantBuffer<C> {
    id: BufferId,
    stage: ShaderStage,
    slot: u32,
    _marker: PhantomData<C>,
}

impl<C: Pod> ConstantBuffer<C> {
    pub fn new(gfx: &mut Graphics, stage: ShaderStage, slot: u32, initial: &C) -> Result<Self> {
        let id = gfx
            .backend_mut()
            .create_constant_buffer(bytemuck::bytes_of(initial))?;
        Ok(Self {
            id,
            stage,
            slot,
            _marker: PhantomData,
        })
    }

    /// Vertex-stage buffer.
    pub fn vertex(gfx: &mut Graphics, slot: u32, initial: &C) -> Result<Self> {
        Self::new(gfx, ShaderStage::Vertex, slot, initial)
    }

    /// Pixel-stage buffer.
    pub fn pixel(gfx: &mut Graphics, slot: u32, initial: &C) -> Result<Self> {
        Self::new(gfx, ShaderStage::Pixel, slot, initial)
    }

    pub fn update(&self, gfx: &mut Graphics, data: &C) {
        gfx.backend_mut()
            .update_constant_buffer(self.id, bytemuck::bytes_of(data));
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Attaches the buffer without going through a draw context.
    pub fn bind_to(&self, gfx: &mut Graphics) {
        gfx.backend_mut()
            .set_constant_buffer(self.stage, self.slot, self.id);
    }
}

/// Byte-level upload into a constant buffer whose element type is erased.
pub trait ConstantUpload {
    fn upload_bytes(&self, gfx: &mut Graphics, bytes: &[u8]) -> Result<(), BindError>;
}

impl<C: Pod> ConstantUpload for ConstantBuffer<C> {
    fn upload_bytes(&self, gfx: &mut Graphics, bytes: &[u8]) -> Result<(), BindError> {
        let expected = std::mem::size_of::<C>();
        if bytes.len() != expected {
            return Err(BindError::ConstantSize {
                kind: self.kind(),
                expected,
                actual: bytes.len(),
            });
        }
        gfx.backend_mut().update_constant_buffer(self.id, bytes);
        Ok(())
    }
}

impl<C: Pod> Bindable for ConstantBuffer<C> {
    fn bind(&self, gfx: &mut Graphics, _ctx: &DrawContext) {
        self.bind_to(gfx);
    }

    fn kind(&self) -> BindableKind {
        match self.stage {
            ShaderStage::Vertex => BindableKind::VertexConstantBuffer,
            ShaderStage::Pixel => BindableKind::PixelConstantBuffer,
        }
    }

    fn as_constant_upload(&self) -> Option<&dyn ConstantUpload> {
        Some(self)
    }
}
